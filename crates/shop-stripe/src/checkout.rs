//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API.
//! Every session is a one-time card payment on Stripe's hosted page.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use shop_core::{PaymentProcessor, PaymentSession, SessionParams, ShopError, ShopResult};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session processor
///
/// Uses Stripe's hosted checkout page so card details never touch our servers.
pub struct StripeCheckoutProcessor {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProcessor {
    /// Create a new Stripe checkout processor
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShopError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Flatten a session request into Stripe's bracketed form encoding
    fn form_params(params: &SessionParams) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), params.success_url.clone()),
            ("cancel_url".to_string(), params.cancel_url.clone()),
        ];

        for (i, item) in params.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", i);
            let price = &item.price_data;
            form.push((
                format!("{}[price_data][currency]", prefix),
                price.currency.as_str().to_string(),
            ));
            form.push((
                format!("{}[price_data][unit_amount]", prefix),
                price.unit_amount.to_string(),
            ));
            form.push((
                format!("{}[price_data][product_data][name]", prefix),
                price.product_data.name.clone(),
            ));
            for (j, image) in price.product_data.images.iter().enumerate() {
                form.push((
                    format!("{}[price_data][product_data][images][{}]", prefix, j),
                    image.clone(),
                ));
            }
            form.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
        }

        form
    }
}

#[async_trait]
impl PaymentProcessor for StripeCheckoutProcessor {
    #[instrument(skip(self, params), fields(items = params.line_items.len()))]
    async fn create_payment_session(&self, params: &SessionParams) -> ShopResult<PaymentSession> {
        if params.line_items.is_empty() {
            return Err(ShopError::InvalidRequest(
                "Session has no line items".to_string(),
            ));
        }

        let form = Self::form_params(params);
        debug!("Creating Stripe checkout session: {} form fields", form.len());

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            let message = match serde_json::from_str::<StripeErrorResponse>(&body) {
                Ok(parsed) => parsed.error.describe(),
                Err(_) => format!("HTTP {}", status),
            };
            return Err(ShopError::Provider {
                provider: PROVIDER.to_string(),
                message,
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            ShopError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        if session.id.is_empty() {
            return Err(ShopError::Serialization(
                "Stripe returned an empty session id".to_string(),
            ));
        }

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(PaymentSession {
            id: session.id,
            url: session.url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    url: String,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    param: Option<String>,
}

impl StripeError {
    fn describe(&self) -> String {
        match (&self.kind, &self.param) {
            (Some(kind), Some(param)) => format!("{} ({}, param {})", self.message, kind, param),
            (Some(kind), None) => format!("{} ({})", self.message, kind),
            _ => self.message.clone(),
        }
    }
}
