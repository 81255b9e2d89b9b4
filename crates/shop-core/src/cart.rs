//! # Cart Store
//!
//! In-memory cart owned by a single browsing session. Entries keep their
//! insertion order and the same product may appear more than once, each
//! entry standing for quantity 1. Removal is positional: indices always
//! refer to the current order, so callers re-derive them after every change.

use crate::checkout::LineItem;
use crate::error::{ShopError, ShopResult};
use crate::product::{Currency, Price, Product};
use serde::Serialize;

/// One selected product at a position in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product: Product,
}

impl CartEntry {
    pub fn unit_price(&self) -> Price {
        self.product.price
    }
}

/// Ordered collection of cart entries
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    currency: Currency,
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart priced in `currency`
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            entries: Vec::new(),
        }
    }

    /// Append a product to the end of the cart
    pub fn add(&mut self, product: &Product) {
        self.entries.push(CartEntry {
            product: product.clone(),
        });
    }

    /// Remove the entry at `index` and return its product.
    ///
    /// An out-of-range index leaves the cart untouched.
    pub fn remove_at(&mut self, index: usize) -> ShopResult<Product> {
        if index >= self.entries.len() {
            return Err(ShopError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index).product)
    }

    /// Sum of unit prices of all entries
    pub fn total(&self) -> Price {
        Price {
            amount: self.entries.iter().map(|e| e.unit_price().amount).sum(),
            currency: self.currency,
        }
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line item per entry, quantity 1, in cart order
    pub fn line_items(&self) -> Vec<LineItem> {
        self.entries
            .iter()
            .map(|entry| LineItem::from_product(&entry.product, self.currency))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, price: &str) -> Product {
        Product::new(
            id,
            format!("Product {}", id),
            Price::parse(price, Currency::EUR).unwrap(),
            format!("https://img.example/{}.jpg", id),
        )
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new(Currency::EUR);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::zero(Currency::EUR));
        assert!(cart.line_items().is_empty());
    }

    #[test]
    fn test_total_is_order_independent() {
        let a = product(1, "299.99");
        let b = product(3, "449.99");
        let c = product(6, "2499.99");

        let mut forward = Cart::new(Currency::EUR);
        for p in [&a, &b, &c] {
            forward.add(p);
        }

        let mut backward = Cart::new(Currency::EUR);
        for p in [&c, &b, &a] {
            backward.add(p);
        }

        assert_eq!(forward.total().amount, 29999 + 44999 + 249999);
        assert_eq!(forward.total(), backward.total());
    }

    #[test]
    fn test_duplicates_are_separate_entries() {
        let panel = product(1, "299.99");
        let mut cart = Cart::new(Currency::EUR);
        cart.add(&panel);
        cart.add(&panel);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total().amount, 59998);

        cart.remove_at(0).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().amount, 29999);
    }

    #[test]
    fn test_remove_at_reduces_total_by_entry_price() {
        let mut cart = Cart::new(Currency::EUR);
        cart.add(&product(1, "299.99"));
        cart.add(&product(3, "449.99"));
        cart.add(&product(4, "599.99"));

        let before = cart.total().amount;
        let removed = cart.remove_at(1).unwrap();
        assert_eq!(removed.id, 3);
        assert_eq!(cart.total().amount, before - 44999);

        // Positions shift after a removal
        let ids: Vec<u32> = cart.entries().iter().map(|e| e.product.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let removed = cart.remove_at(1).unwrap();
        assert_eq!(removed.id, 4);
        assert!(matches!(
            cart.remove_at(1),
            Err(ShopError::OutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_out_of_range_is_a_no_op() {
        let mut cart = Cart::new(Currency::EUR);
        cart.add(&product(2, "349.99"));

        assert!(cart.remove_at(5).is_err());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().amount, 34999);

        let mut empty = Cart::new(Currency::EUR);
        assert!(matches!(
            empty.remove_at(0),
            Err(ShopError::OutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_line_items_from_cart() {
        let mut cart = Cart::new(Currency::EUR);
        cart.add(&product(1, "299.99"));
        cart.add(&product(3, "449.99"));

        let items = cart.line_items();
        let amounts: Vec<i64> = items.iter().map(|i| i.price_data.unit_amount).collect();
        assert_eq!(amounts, vec![29999, 44999]);
        assert!(items.iter().all(|i| i.quantity == 1));
        assert!(items.iter().all(|i| i.price_data.currency == Currency::EUR));
        assert_eq!(cart.total().amount, 74998);
        assert_eq!(cart.total().display(), "€749.98");
    }
}
