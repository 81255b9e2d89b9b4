//! # shop-core
//!
//! Core types and traits for the panel-shop storefront.
//!
//! This crate provides:
//! - `Product`, `Price` and `ProductCatalog` for the product catalog
//! - `Cart` for the per-session cart store
//! - `LineItem`, `CheckoutSessionRequest` and friends for the checkout wire format
//! - `PaymentProcessor` and `MessageRelay` traits for the hosted services
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{Cart, CheckoutSessionRequest, ProductCatalog};
//!
//! let catalog = ProductCatalog::builtin();
//! let mut cart = Cart::new(catalog.currency());
//!
//! cart.add(catalog.get(1).unwrap());
//! cart.add(catalog.get(3).unwrap());
//! assert_eq!(cart.total().display(), "€749.98");
//!
//! let request = CheckoutSessionRequest::new(cart.line_items());
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod product;
pub mod strategy;

// Re-exports for convenience
pub use cart::{Cart, CartEntry};
pub use checkout::{
    CheckoutSessionRequest, CheckoutSessionResponse, ErrorBody, LineItem, PaymentSession,
    PriceData, ProductData, SessionParams, MAX_AMOUNT,
};
pub use error::{ShopError, ShopResult};
pub use product::{Currency, Price, Product, ProductCatalog};
pub use strategy::{
    BoxedPaymentProcessor, CheckoutUrls, ContactMessage, MessageRelay, PaymentProcessor,
};
