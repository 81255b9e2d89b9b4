//! # Application State
//!
//! Shared state for the Axum application.
//! Everything in here is immutable after start-up; handlers never write to it.

use reqwest::Url;
use shop_core::{BoxedPaymentProcessor, CheckoutUrls, ProductCatalog, ShopError, ShopResult};
use shop_stripe::StripeCheckoutProcessor;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the deployment; redirect targets hang off it
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog file, if any
    pub catalog_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    ///
    /// `BASE_URL` is required (Netlify's `URL` is accepted as a fallback).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ShopResult<Self> {
        let non_blank = |key: &str| lookup(key).filter(|u| !u.trim().is_empty());
        let base_url = non_blank("BASE_URL")
            .or_else(|| non_blank("URL"))
            .ok_or_else(|| ShopError::Configuration("BASE_URL not set".to_string()))?;

        let parsed = Url::parse(&base_url)
            .map_err(|e| ShopError::Configuration(format!("BASE_URL is not a URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShopError::Configuration(
                "BASE_URL must be http or https".to_string(),
            ));
        }

        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ShopError::Configuration(format!("PORT is not a port: {}", p)))?,
            None => 8080,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            catalog_path: lookup("CATALOG_PATH"),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ShopResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("invalid bind address: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor
    pub processor: BoxedPaymentProcessor,
    /// Product catalog
    pub catalog: Arc<ProductCatalog>,
    /// Checkout redirect URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with the Stripe processor
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        // Load product catalog
        let catalog = load_product_catalog(config.catalog_path.as_deref())?;

        let processor = StripeCheckoutProcessor::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_processor(config, Arc::new(processor), catalog))
    }

    /// Assemble state around an existing processor
    pub fn with_processor(
        config: AppConfig,
        processor: BoxedPaymentProcessor,
        catalog: ProductCatalog,
    ) -> Self {
        Self {
            processor,
            catalog: Arc::new(catalog),
            urls: CheckoutUrls::new(&config.base_url),
            config: Arc::new(config),
        }
    }
}

/// Load product catalog from config file
fn load_product_catalog(explicit: Option<&str>) -> anyhow::Result<ProductCatalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        let catalog = ProductCatalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
        tracing::info!("Loaded {} products from {}", catalog.len(), path);
        return Ok(catalog);
    }

    // Try the usual locations relative to the working directory
    let config_paths = [
        "config/products.toml",
        "../config/products.toml",
        "../../config/products.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} products from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No product catalog found, using built-in catalog");
    Ok(ProductCatalog::builtin())
}
