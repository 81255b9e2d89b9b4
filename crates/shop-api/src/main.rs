//! # panel-shop
//!
//! Checkout session service for the Panele Solare storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export BASE_URL=https://panelesolare.al
//!
//! # Run the server
//! panel-shop
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    // Initialize application state; missing keys stop us here
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.len());
    info!("Payment processor: {}", state.processor.provider_name());
    info!("Redirect targets: {} | {}", state.urls.success_url(), state.urls.cancel_url());

    // Create router
    let app = routes::create_router(state);

    info!("panel-shop starting on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/api/create-checkout", addr);
        info!("Products: GET http://{}/api/v1/products", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
