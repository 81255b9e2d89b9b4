//! # shop-stripe
//!
//! Stripe Checkout payment processor for panel-shop.
//!
//! `StripeCheckoutProcessor` implements `shop_core::PaymentProcessor` on top
//! of the Checkout Sessions API:
//! - inline `price_data` line items, passed through as received
//! - one-time `payment` mode, card payments
//! - a fresh idempotency key per request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_core::{CheckoutUrls, PaymentProcessor, SessionParams};
//! use shop_stripe::StripeCheckoutProcessor;
//!
//! // Create processor from environment
//! let processor = StripeCheckoutProcessor::from_env()?;
//!
//! let urls = CheckoutUrls::new("https://panelesolare.al");
//! let session = processor
//!     .create_payment_session(&SessionParams {
//!         line_items: cart.line_items(),
//!         success_url: urls.success_url(),
//!         cancel_url: urls.cancel_url(),
//!     })
//!     .await?;
//!
//! // Redirect user to session.url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutProcessor;
pub use config::StripeConfig;
