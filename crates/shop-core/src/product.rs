//! # Product Types
//!
//! Product catalog types for the storefront.
//! Products are loaded from `config/products.toml`, or from the built-in
//! catalog when no file is present.

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    ALL,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CHF => "chf",
            Currency::ALL => "all",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a decimal amount ("299.99") into the smallest currency unit.
    ///
    /// Digits past the currency's precision are rounded half-up on the
    /// scaled integer. Negative amounts are rejected.
    pub fn parse_minor(&self, text: &str) -> ShopResult<i64> {
        let text = text.trim();
        if text.starts_with('-') {
            return Err(invalid_price(text, "negative amount"));
        }
        let unsigned = text.strip_prefix('+').unwrap_or(text);
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid_price(text, "no digits"));
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid_price(text, "not a decimal number"));
        }

        let places = self.decimal_places() as usize;
        let too_large = || invalid_price(text, "amount too large");

        let mut amount: i64 = 0;
        let kept = frac.bytes().chain(std::iter::repeat(b'0')).take(places);
        for digit in whole.bytes().chain(kept) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add(i64::from(digit - b'0')))
                .ok_or_else(too_large)?;
        }

        // Half-up: only the first dropped digit decides
        if frac.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
            amount = amount.checked_add(1).ok_or_else(too_large)?;
        }

        Ok(amount)
    }

    /// Convert a decimal amount to the smallest currency unit (cents, etc.)
    ///
    /// Goes through the shortest decimal text of `amount`, so `1.005`
    /// becomes 101 rather than the 100 that `1.005 * 100.0` would give.
    pub fn to_smallest_unit(&self, amount: f64) -> ShopResult<i64> {
        if !amount.is_finite() {
            return Err(invalid_price(&amount.to_string(), "not a finite number"));
        }
        if amount == 0.0 {
            return Ok(0);
        }
        self.parse_minor(&amount.to_string())
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CHF => "CHF ",
            Currency::ALL => "L ",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

fn invalid_price(text: &str, why: &str) -> ShopError {
    ShopError::InvalidPrice {
        message: format!("{:?}: {}", text, why),
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for EUR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from a decimal amount
    pub fn new(amount: f64, currency: Currency) -> ShopResult<Self> {
        Ok(Self {
            amount: currency.to_smallest_unit(amount)?,
            currency,
        })
    }

    /// Create a price from decimal text ("449.99")
    pub fn parse(text: &str, currency: Currency) -> ShopResult<Self> {
        Ok(Self {
            amount: currency.parse_minor(text)?,
            currency,
        })
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> ShopResult<Self> {
        if amount < 0 {
            return Err(ShopError::InvalidPrice {
                message: format!("negative amount {}", amount),
            });
        }
        Ok(Self { amount, currency })
    }

    /// Zero in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Format for display (e.g., "€299.99")
    pub fn display(&self) -> String {
        let places = u32::from(self.currency.decimal_places());
        let sign = if self.amount < 0 { "-" } else { "" };
        let minor = self.amount.unsigned_abs();
        if places == 0 {
            return format!("{}{}{}", sign, self.currency.symbol(), minor);
        }
        let scale = 10_u64.pow(places);
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.currency.symbol(),
            minor / scale,
            minor % scale,
            width = places as usize
        )
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier within the catalog
    pub id: u32,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Image URL shown on the product card and the hosted checkout page
    pub image: String,
}

impl Product {
    pub fn new(id: u32, name: impl Into<String>, price: Price, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductCatalog {
    currency: Currency,
    products: Vec<Product>,
}

const PANEL_IMAGE: &str = "https://images.unsplash.com/photo-1509391366360-2e959784a276?ixlib=rb-4.0.3&auto=format&fit=crop&w=300&q=80";

/// Built-in catalog: (id, name, price)
const BUILTIN_PRODUCTS: &[(u32, &str, &str)] = &[
    (1, "Panel Solar 400W Mono", "299.99"),
    (2, "Panel Solar 450W Poly", "349.99"),
    (3, "Panel Solar 500W Bifacial", "449.99"),
    (4, "Inverter 3kW", "599.99"),
    (5, "Inverter 5kW", "799.99"),
    (6, "Bateria Litium 5kWh", "2499.99"),
];

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            products: Vec::new(),
        }
    }

    /// The storefront's default line-up, priced in EUR
    pub fn builtin() -> Self {
        let mut catalog = Self::new(Currency::EUR);
        for (id, name, price) in BUILTIN_PRODUCTS {
            // Static table: ids are unique and prices well formed
            if let Ok(price) = Price::parse(price, Currency::EUR) {
                catalog.products.push(Product::new(*id, *name, price, PANEL_IMAGE));
            }
        }
        catalog
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) -> ShopResult<()> {
        if product.price.currency != self.currency {
            return Err(ShopError::Configuration(format!(
                "product {} is priced in {}, catalog uses {}",
                product.id, product.price.currency, self.currency
            )));
        }
        if self.get(product.id).is_some() {
            return Err(ShopError::Configuration(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        self.products.push(product);
        Ok(())
    }

    /// Find a product by ID
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in display order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Currency every product is priced in
    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string
    ///
    /// ```toml
    /// currency = "eur"
    ///
    /// [[products]]
    /// id = 1
    /// name = "Panel Solar 400W Mono"
    /// price = 299.99
    /// image = "https://..."
    /// ```
    pub fn from_toml(toml_str: &str) -> ShopResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| ShopError::Configuration(format!("invalid catalog: {}", e)))?;

        let mut catalog = Self::new(file.currency);
        for entry in file.products {
            let amount = match entry.price {
                DecimalAmount::Integer(units) => units
                    .checked_mul(10_i64.pow(u32::from(file.currency.decimal_places())))
                    .ok_or_else(|| invalid_price(&units.to_string(), "amount too large"))
                    .and_then(|minor| Price::from_cents(minor, file.currency)),
                DecimalAmount::Float(value) => Price::new(value, file.currency),
                DecimalAmount::Text(text) => Price::parse(&text, file.currency),
            }
            .map_err(|e| {
                ShopError::Configuration(format!("product {}: {}", entry.id, e))
            })?;
            catalog.add(Product::new(entry.id, entry.name, amount, entry.image))?;
        }
        Ok(catalog)
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    currency: Currency,
    #[serde(default)]
    products: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    id: u32,
    name: String,
    price: DecimalAmount,
    image: String,
}

/// Prices may be written as `300`, `299.99` or `"299.99"` in the file
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalAmount {
    Integer(i64),
    Float(f64),
    Text(String),
}
