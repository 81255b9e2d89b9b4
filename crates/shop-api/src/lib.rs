//! # shop-api
//!
//! Checkout session service for panel-shop.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The stateless checkout session endpoint
//! - Read-only catalog endpoints and the redirect landing pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-checkout` | Create checkout session |
//! | POST | `/.netlify/functions/create-checkout` | Alias of the above |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/success`, `/cancel` | Processor redirect targets |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
