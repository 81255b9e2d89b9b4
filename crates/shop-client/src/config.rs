//! # Client Configuration
//!
//! Endpoint and relay identifiers for the storefront page.
//! None of these values are secret: the EmailJS public key is meant to ship
//! to browsers.

use shop_core::ShopError;
use std::env;
use std::time::Duration;

const DEFAULT_CHECKOUT_ENDPOINT: &str = "http://localhost:8080/api/create-checkout";
const DEFAULT_EMAILJS_API: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS service/template pair
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Send endpoint (for testing/mocking)
    pub api_url: String,
}

impl EmailJsConfig {
    pub fn new(
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: public_key.into(),
            api_url: DEFAULT_EMAILJS_API.to_string(),
        }
    }

    /// Builder: set custom send endpoint
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// Storefront client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Checkout session endpoint
    pub checkout_endpoint: String,
    /// Contact relay
    pub emailjs: EmailJsConfig,
    /// Timeout for every outbound request
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `EMAILJS_SERVICE_ID`
    /// - `EMAILJS_TEMPLATE_ID`
    /// - `EMAILJS_PUBLIC_KEY`
    ///
    /// Optional:
    /// - `CHECKOUT_ENDPOINT` (defaults to the local service)
    /// - `EMAILJS_API_URL`
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ShopError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ShopError::Configuration(format!("{} not set", key)))
        };

        let mut emailjs = EmailJsConfig::new(
            required("EMAILJS_SERVICE_ID")?,
            required("EMAILJS_TEMPLATE_ID")?,
            required("EMAILJS_PUBLIC_KEY")?,
        );
        if let Some(url) = lookup("EMAILJS_API_URL") {
            emailjs = emailjs.with_api_url(url);
        }

        Ok(Self {
            checkout_endpoint: lookup("CHECKOUT_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_CHECKOUT_ENDPOINT.to_string()),
            emailjs,
            timeout: Duration::from_secs(30),
        })
    }
}
