//! # Request Handlers
//!
//! Axum request handlers for the checkout session service.
//! Callers only ever see `{ "message": ... }` with a generic text; the
//! underlying error goes to the log.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use shop_core::{
    CheckoutSessionRequest, CheckoutSessionResponse, ErrorBody, Price, Product, SessionParams,
    ShopError,
};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Error Responses
// =============================================================================

/// A `ShopError` on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub ShopError);

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorBody::new(self.0.public_message()));

        if status == StatusCode::METHOD_NOT_ALLOWED {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }
        (status, body).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "panel-shop",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a hosted checkout session from the posted line items
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let request = CheckoutSessionRequest::from_json(&body).map_err(|e| {
        warn!("Rejected checkout request: {}", e);
        e
    })?;

    if let Some(first) = request.line_items.first() {
        let total = Price {
            amount: request.total()?,
            currency: first.price_data.currency,
        };
        info!(
            "Creating checkout: {} items, total={}",
            request.item_count()?,
            total.display()
        );
    }

    // Redirect targets come from our own config, never from the request
    let params = SessionParams {
        line_items: request.line_items,
        success_url: state.urls.success_url(),
        cancel_url: state.urls.cancel_url(),
    };

    let session = state
        .processor
        .create_payment_session(&params)
        .await
        .map_err(|e| {
            error!(
                provider = state.processor.provider_name(),
                "Failed to create checkout session: {}", e
            );
            e.into_internal()
        })?;

    info!("Created checkout session: {}", session.id);

    Ok(Json(session.into()))
}

/// Any method other than POST on the checkout endpoint
pub async fn method_not_allowed() -> ApiError {
    ApiError(ShopError::MethodNotAllowed)
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "currency": state.catalog.currency(),
        "products": state.catalog.products(),
        "count": state.catalog.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<u32>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .catalog
        .get(product_id)
        .ok_or(ShopError::ProductNotFound { product_id })?;

    Ok(Json(product.clone()))
}

/// Checkout success page
pub async fn checkout_success() -> impl IntoResponse {
    Html(landing_page(
        "Payment Successful",
        "✅",
        "Thank you! Your payment was processed successfully.",
    ))
}

/// Checkout cancel page
pub async fn checkout_cancel() -> impl IntoResponse {
    Html(landing_page(
        "Payment Cancelled",
        "❌",
        "No charges were made. Your cart is still waiting for you.",
    ))
}

fn landing_page(title: &str, icon: &str, text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f3f4f6;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">{icon}</div>
        <h1>{title}</h1>
        <p style="color: #666;">{text}</p>
        <p><a href="/">Back to the shop</a></p>
    </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let response = ApiError(ShopError::InvalidRequest("Bad data".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(ShopError::MethodNotAllowed).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");

        let response = ApiError(ShopError::Internal("stripe said no".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_landing_page() {
        let page = landing_page("Payment Cancelled", "❌", "No charges were made.");
        assert!(page.contains("<h1>Payment Cancelled</h1>"));
    }
}
