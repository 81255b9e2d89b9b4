//! # shop-client
//!
//! The storefront page's side of panel-shop.
//!
//! This crate provides:
//! - `Storefront`, the session-scoped state container (catalog, cart, forms)
//! - `CheckoutClient`, the guarded cart-to-hosted-checkout handoff
//! - `ContactRelayClient` and `EmailJsRelay` for the contact form
//! - `Notifier` / `Redirector` seams for whatever UI hosts the session
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_client::{ClientConfig, Storefront, TracingNotifier, UrlRedirector};
//!
//! let config = ClientConfig::from_env()?;
//! let redirector = Arc::new(UrlRedirector::new(|url: &str| open_in_browser(url)));
//! let mut store = Storefront::from_config(&config, catalog, redirector, Arc::new(TracingNotifier))?;
//!
//! store.add_to_cart(1)?;
//! store.add_to_cart(3)?;
//! store.checkout().await?;
//! ```

pub mod checkout;
pub mod config;
pub mod contact;
pub mod notify;
pub mod session;

#[cfg(test)]
mod testing;

pub use checkout::{CheckoutBackend, CheckoutClient, HttpCheckoutBackend, Redirector, UrlRedirector};
pub use config::{ClientConfig, EmailJsConfig};
pub use contact::{ContactForm, ContactRelayClient, EmailJsRelay};
pub use notify::{Notifier, TracingNotifier};
pub use session::Storefront;
