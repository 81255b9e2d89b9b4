//! # shop-wasm
//!
//! WebAssembly bindings for the panel-shop cart.
//!
//! The page keeps its cart in a `WasmCart` so totals and the checkout
//! payload use the same integer arithmetic as the server, then posts
//! `checkoutPayload()` to the checkout endpoint itself.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart } from 'panel-shop-wasm';
//!
//! await init();
//!
//! const cart = new WasmCart();
//! cart.add(1);
//! cart.add(3);
//! console.log('Total:', cart.formatTotal()); // €749.98
//!
//! const res = await fetch('/api/create-checkout', {
//!   method: 'POST',
//!   headers: { 'Content-Type': 'application/json' },
//!   body: cart.checkoutPayload(),
//! });
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use shop_core::{
    Cart, CheckoutSessionRequest, Currency, Price, ProductCatalog, ShopError, ShopResult,
};
use wasm_bindgen::prelude::*;

/// Cart bound to a catalog, exported to JavaScript
#[wasm_bindgen]
pub struct WasmCart {
    catalog: ProductCatalog,
    cart: Cart,
}

#[wasm_bindgen]
impl WasmCart {
    /// Empty cart over the built-in catalog
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_catalog(ProductCatalog::builtin())
    }

    /// Empty cart over a catalog shipped as TOML
    #[wasm_bindgen(js_name = fromCatalogToml)]
    pub fn from_catalog_toml(toml: &str) -> Result<WasmCart, JsValue> {
        ProductCatalog::from_toml(toml)
            .map(Self::with_catalog)
            .map_err(to_js)
    }

    /// Add one unit of a catalog product
    pub fn add(&mut self, product_id: u32) -> Result<(), JsValue> {
        self.try_add(product_id).map_err(to_js)
    }

    /// Remove the entry currently shown at `index`
    #[wasm_bindgen(js_name = removeAt)]
    pub fn remove_at(&mut self, index: usize) -> Result<(), JsValue> {
        self.cart.remove_at(index).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Cart total in cents
    #[wasm_bindgen(js_name = totalCents)]
    pub fn total_cents(&self) -> i64 {
        self.cart.total().amount
    }

    /// Cart total for display
    #[wasm_bindgen(js_name = formatTotal)]
    pub fn format_total(&self) -> String {
        self.cart.total().display()
    }

    /// Entries in display order, as JSON
    #[wasm_bindgen(js_name = entriesJson)]
    pub fn entries_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.cart.entries()).map_err(|e| to_js(e.into()))
    }

    /// Body for `POST /api/create-checkout`; fails on an empty cart
    #[wasm_bindgen(js_name = checkoutPayload)]
    pub fn checkout_payload(&self) -> Result<String, JsValue> {
        self.payload().map_err(to_js)
    }
}

impl WasmCart {
    fn with_catalog(catalog: ProductCatalog) -> Self {
        Self {
            cart: Cart::new(catalog.currency()),
            catalog,
        }
    }

    fn try_add(&mut self, product_id: u32) -> ShopResult<()> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or(ShopError::ProductNotFound { product_id })?;
        self.cart.add(product);
        Ok(())
    }

    fn payload(&self) -> ShopResult<String> {
        if self.cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }
        Ok(serde_json::to_string(&CheckoutSessionRequest::new(
            self.cart.line_items(),
        ))?)
    }
}

impl Default for WasmCart {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(err: ShopError) -> JsValue {
    JsValue::from_str(err.public_message())
}

/// The built-in catalog as JSON
#[wasm_bindgen(js_name = catalogJson)]
pub fn catalog_json() -> String {
    serde_json::to_string(&ProductCatalog::builtin()).unwrap_or_else(|_| "{}".to_string())
}

/// Format a price in euro cents to display string
#[wasm_bindgen(js_name = formatPrice)]
pub fn format_price(cents: i64) -> String {
    Price {
        amount: cents,
        currency: Currency::EUR,
    }
    .display()
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
