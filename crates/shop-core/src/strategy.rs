//! # External Service Traits
//!
//! Narrow seams for the two hosted services the storefront talks to.
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │   PaymentProcessor (trait)   │   │     MessageRelay (trait)     │
//! │  ├── create_payment_session()│   │  ├── send_message()          │
//! │  └── provider_name()         │   │  └── relay_name()            │
//! └──────────────────────────────┘   └──────────────────────────────┘
//!                ▲                                  ▲
//!        ┌───────┴────────┐                 ┌───────┴───────┐
//!        │ StripeCheckout │                 │  EmailJsRelay │
//!        │   Processor    │                 │               │
//!        └────────────────┘                 └───────────────┘
//! ```

use crate::checkout::{PaymentSession, SessionParams};
use crate::error::{ShopError, ShopResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Creates hosted payment sessions.
///
/// Implementations must open a one-time payment session (never a
/// subscription) and pass the line items through unmodified.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a session and return its identifier and hosted URL.
    async fn create_payment_session(&self, params: &SessionParams) -> ShopResult<PaymentSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type BoxedPaymentProcessor = Arc<dyn PaymentProcessor>;

/// Contact form payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// All three fields are required
    pub fn validate(&self) -> ShopResult<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ShopError::InvalidRequest(format!(
                "missing contact fields: {}",
                missing.join(", ")
            )));
        }
        if !self.email.contains('@') {
            return Err(ShopError::InvalidRequest("email has no '@'".to_string()));
        }
        Ok(())
    }
}

/// Delivers contact messages through a hosted email relay.
#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn send_message(&self, message: &ContactMessage) -> ShopResult<()>;

    fn relay_name(&self) -> &'static str;
}

/// Redirect targets handed to the processor.
///
/// Always derived from the deployment's own base URL.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the deployment (e.g., "https://panelesolare.al")
    pub base_url: String,
    pub success_path: String,
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success_path: "/success".to_string(),
            cancel_path: "/cancel".to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}
