//! # Shop Error Types
//!
//! Typed error handling for the storefront.
//! All cart, checkout and relay operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request used an HTTP method the endpoint does not accept
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Malformed or incomplete request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: u32 },

    /// Price could not be represented in minor units
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Cart position does not exist
    #[error("Cart index {index} out of range (cart has {len} entries)")]
    OutOfRange { index: usize, len: usize },

    /// Checkout attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout request is already in flight for this session
    #[error("Checkout already in progress")]
    CheckoutInProgress,

    /// Payment processor API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error talking to an external service
    #[error("Network error: {0}")]
    Network(String),

    /// Processor could not send the customer to its hosted page
    #[error("Redirect to hosted checkout failed: {0}")]
    Redirect(String),

    /// Contact relay did not accept the message
    #[error("Message submission failed: {0}")]
    SubmissionFailure(String),

    /// Internal error during session creation
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::MethodNotAllowed => 405,
            ShopError::InvalidRequest(_) => 400,
            ShopError::ProductNotFound { .. } => 404,
            ShopError::InvalidPrice { .. } => 400,
            ShopError::OutOfRange { .. } => 400,
            ShopError::EmptyCart => 400,
            ShopError::CheckoutInProgress => 409,
            // Everything below is reported to callers as a plain internal error
            ShopError::Configuration(_)
            | ShopError::Provider { .. }
            | ShopError::Network(_)
            | ShopError::Redirect(_)
            | ShopError::SubmissionFailure(_)
            | ShopError::Internal(_)
            | ShopError::Serialization(_) => 500,
        }
    }

    /// Short, non-technical text safe to show to a customer.
    ///
    /// Never includes the wrapped detail; that belongs in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            ShopError::MethodNotAllowed => "Method not allowed",
            ShopError::InvalidRequest(_) | ShopError::InvalidPrice { .. } => "Invalid request",
            ShopError::ProductNotFound { .. } => "Product not found",
            ShopError::OutOfRange { .. } => "That item is no longer in the cart",
            ShopError::EmptyCart => "Your cart is empty",
            ShopError::CheckoutInProgress => "Checkout is already in progress",
            _ => "Internal server error",
        }
    }

    /// Collapse processor-side failures into the generic internal error.
    ///
    /// Validation errors pass through unchanged.
    pub fn into_internal(self) -> Self {
        match self {
            ShopError::Provider { .. }
            | ShopError::Network(_)
            | ShopError::Serialization(_)
            | ShopError::Configuration(_)
            | ShopError::Redirect(_) => ShopError::Internal(self.to_string()),
            other => other,
        }
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
