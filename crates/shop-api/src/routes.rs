//! # Routes
//!
//! Axum router configuration for the checkout session service.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Checkout:
///   - POST /api/create-checkout - Create a hosted checkout session
///   - POST /.netlify/functions/create-checkout - Same, for existing front ends
///   - any other method on either path - 405
///
/// - Catalog:
///   - GET  /api/v1/products - List all products
///   - GET  /api/v1/products/{id} - Get product by ID
///
/// - Static pages:
///   - GET /success - Success page
///   - GET /cancel - Cancel page
pub fn create_router(state: AppState) -> Router {
    // The page may be served from a different origin than the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let checkout = post(handlers::create_checkout_session).fallback(handlers::method_not_allowed);

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Processor redirect targets
        .route("/success", get(handlers::checkout_success))
        .route("/cancel", get(handlers::checkout_cancel))
        // Checkout
        .route("/api/create-checkout", checkout.clone())
        .route("/.netlify/functions/create-checkout", checkout)
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
