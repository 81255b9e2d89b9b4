//! # Checkout Types
//!
//! Wire types exchanged between the storefront page, the checkout session
//! endpoint and the payment processor.

use crate::error::{ShopError, ShopResult};
use crate::product::{Currency, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest amount, in the smallest currency unit, the processor accepts
/// for a single charge (eight digits)
pub const MAX_AMOUNT: i64 = 99_999_999;

/// Product shown on the hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Inline price for a line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    pub currency: Currency,
    pub product_data: ProductData,
    /// Amount in smallest currency unit
    pub unit_amount: i64,
}

/// A line item in a checkout session request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub price_data: PriceData,
    pub quantity: u32,
}

impl LineItem {
    /// Create a single-quantity line item from a product
    pub fn from_product(product: &Product, currency: Currency) -> Self {
        Self {
            price_data: PriceData {
                currency,
                product_data: ProductData {
                    name: product.name.clone(),
                    images: vec![product.image.clone()],
                },
                unit_amount: product.price.amount,
            },
            quantity: 1,
        }
    }

    /// Total for this line item in smallest currency unit
    pub fn total(&self) -> ShopResult<i64> {
        self.price_data
            .unit_amount
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| ShopError::InvalidRequest("line item total overflows".to_string()))
    }
}

/// Body of `POST /api/create-checkout`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<LineItem>,
}

impl CheckoutSessionRequest {
    pub fn new(line_items: Vec<LineItem>) -> Self {
        Self { line_items }
    }

    /// Parse and validate a raw request body
    pub fn from_json(body: &[u8]) -> ShopResult<Self> {
        let request: Self = serde_json::from_slice(body)
            .map_err(|e| ShopError::InvalidRequest(format!("malformed body: {}", e)))?;
        request.validate()?;
        Ok(request)
    }

    /// Structural checks; prices themselves are the processor's business
    pub fn validate(&self) -> ShopResult<()> {
        let first = self
            .line_items
            .first()
            .ok_or_else(|| ShopError::InvalidRequest("lineItems is empty".to_string()))?;
        let currency = first.price_data.currency;

        for (i, item) in self.line_items.iter().enumerate() {
            if item.price_data.unit_amount < 0 {
                return Err(ShopError::InvalidRequest(format!(
                    "lineItems[{}].price_data.unit_amount is negative",
                    i
                )));
            }
            if item.quantity == 0 {
                return Err(ShopError::InvalidRequest(format!(
                    "lineItems[{}].quantity must be at least 1",
                    i
                )));
            }
            if item.price_data.product_data.name.trim().is_empty() {
                return Err(ShopError::InvalidRequest(format!(
                    "lineItems[{}].price_data.product_data.name is blank",
                    i
                )));
            }
            if item.price_data.unit_amount > MAX_AMOUNT {
                return Err(ShopError::InvalidRequest(format!(
                    "lineItems[{}].price_data.unit_amount exceeds {}",
                    i, MAX_AMOUNT
                )));
            }
            if item.price_data.currency != currency {
                return Err(ShopError::InvalidRequest(format!(
                    "lineItems[{}] is in {}, expected {}",
                    i, item.price_data.currency, currency
                )));
            }
        }

        let total = self.total()?;
        if total > MAX_AMOUNT {
            return Err(ShopError::InvalidRequest(format!(
                "order total {} exceeds {}",
                total, MAX_AMOUNT
            )));
        }
        self.item_count()?;
        Ok(())
    }

    /// Sum of all line items in smallest currency unit
    pub fn total(&self) -> ShopResult<i64> {
        self.line_items.iter().try_fold(0i64, |sum, item| {
            sum.checked_add(item.total()?)
                .ok_or_else(|| ShopError::InvalidRequest("order total overflows".to_string()))
        })
    }

    pub fn item_count(&self) -> ShopResult<u32> {
        self.line_items.iter().try_fold(0u32, |count, item| {
            count
                .checked_add(item.quantity)
                .ok_or_else(|| ShopError::InvalidRequest("item count overflows".to_string()))
        })
    }
}

/// Successful reply from `POST /api/create-checkout`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    /// Processor session identifier
    pub id: String,
    /// Hosted checkout page, when the processor returns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<PaymentSession> for CheckoutSessionResponse {
    fn from(session: PaymentSession) -> Self {
        Self {
            id: session.id,
            url: Some(session.url),
            expires_at: session.expires_at,
        }
    }
}

/// Error reply: `{ "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything the processor needs to open a one-time payment session
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// A payment session created by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Processor's session ID
    pub id: String,
    /// URL to redirect the customer to for payment
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Price;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn item(amount: serde_json::Value) -> serde_json::Value {
        json!({
            "price_data": {
                "currency": "eur",
                "product_data": { "name": "Inverter 3kW", "images": ["https://img.example/4.jpg"] },
                "unit_amount": amount
            },
            "quantity": 1
        })
    }

    #[test]
    fn test_wire_format() {
        let product = Product::new(
            1,
            "Panel Solar 400W Mono",
            Price::parse("299.99", Currency::EUR).unwrap(),
            "https://img.example/1.jpg",
        );
        let request = CheckoutSessionRequest::new(vec![LineItem::from_product(&product, Currency::EUR)]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "lineItems": [{
                    "price_data": {
                        "currency": "eur",
                        "product_data": {
                            "name": "Panel Solar 400W Mono",
                            "images": ["https://img.example/1.jpg"]
                        },
                        "unit_amount": 29999
                    },
                    "quantity": 1
                }]
            })
        );
    }

    #[test]
    fn test_from_json_accepts_valid_body() {
        let request = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [item(json!(59999)), item(json!(79999))]
        })))
        .unwrap();

        assert_eq!(request.line_items.len(), 2);
        assert_eq!(request.total().unwrap(), 139998);
        assert_eq!(request.item_count().unwrap(), 2);
    }

    #[test]
    fn test_negative_unit_amount_is_invalid() {
        let result = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [item(json!(-100))]
        })));
        assert!(matches!(result, Err(ShopError::InvalidRequest(_))));
    }

    #[test]
    fn test_missing_unit_amount_is_invalid() {
        let result = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [{
                "price_data": { "currency": "eur", "product_data": { "name": "Inverter 3kW" } },
                "quantity": 1
            }]
        })));
        assert!(matches!(result, Err(ShopError::InvalidRequest(_))));
    }

    #[test]
    fn test_malformed_and_empty_bodies_are_invalid() {
        for raw in [
            b"not json".to_vec(),
            body(json!({})),
            body(json!({ "lineItems": [] })),
            body(json!({ "lineItems": [item(json!("12.00"))] })),
        ] {
            assert!(matches!(
                CheckoutSessionRequest::from_json(&raw),
                Err(ShopError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_zero_quantity_and_mixed_currency_are_invalid() {
        let mut zero = item(json!(100));
        zero["quantity"] = json!(0);
        assert!(CheckoutSessionRequest::from_json(&body(json!({ "lineItems": [zero] }))).is_err());

        let mut usd = item(json!(100));
        usd["price_data"]["currency"] = json!("usd");
        assert!(
            CheckoutSessionRequest::from_json(&body(json!({ "lineItems": [item(json!(100)), usd] })))
                .is_err()
        );
    }

    #[test]
    fn test_amounts_past_the_processor_ceiling_are_invalid() {
        let huge = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [item(json!(i64::MAX)), item(json!(i64::MAX))]
        })));
        assert!(matches!(huge, Err(ShopError::InvalidRequest(_))));

        let over = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [item(json!(MAX_AMOUNT + 1))]
        })));
        assert!(matches!(over, Err(ShopError::InvalidRequest(_))));

        // Each line fits, the order total does not
        let split = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [item(json!(MAX_AMOUNT)), item(json!(1))]
        })));
        assert!(matches!(split, Err(ShopError::InvalidRequest(_))));

        let mut bulk = item(json!(MAX_AMOUNT));
        bulk["quantity"] = json!(u32::MAX);
        let bulk = CheckoutSessionRequest::from_json(&body(json!({ "lineItems": [bulk] })));
        assert!(matches!(bulk, Err(ShopError::InvalidRequest(_))));

        let at_limit = CheckoutSessionRequest::from_json(&body(json!({
            "lineItems": [item(json!(MAX_AMOUNT))]
        })))
        .unwrap();
        assert_eq!(at_limit.total().unwrap(), MAX_AMOUNT);
    }

    #[test]
    fn test_unchecked_request_reports_overflow() {
        let mut line = LineItem::from_product(
            &Product::new(1, "Panel Solar 400W Mono", Price::from_cents(1, Currency::EUR).unwrap(), ""),
            Currency::EUR,
        );
        line.price_data.unit_amount = i64::MAX;
        line.quantity = 2;
        assert!(matches!(line.total(), Err(ShopError::InvalidRequest(_))));

        line.quantity = u32::MAX;
        let request = CheckoutSessionRequest::new(vec![line.clone(), line]);
        assert!(request.total().is_err());
        assert!(request.item_count().is_err());
    }

    #[test]
    fn test_currency_outside_allow_list_is_invalid() {
        let mut sek = item(json!(100));
        sek["price_data"]["currency"] = json!("sek");
        let result = CheckoutSessionRequest::from_json(&body(json!({ "lineItems": [sek] })));
        assert!(matches!(result, Err(ShopError::InvalidRequest(_))));

        let mut gbp = item(json!(100));
        gbp["price_data"]["currency"] = json!("gbp");
        assert!(CheckoutSessionRequest::from_json(&body(json!({ "lineItems": [gbp] }))).is_ok());
    }

    #[test]
    fn test_response_omits_absent_fields() {
        let response = CheckoutSessionResponse {
            id: "cs_test_123".to_string(),
            url: None,
            expires_at: None,
        };
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "id": "cs_test_123" }));
    }
}
