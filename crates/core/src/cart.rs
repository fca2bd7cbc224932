//! Session-resident shopping cart.
//!
//! The cart is owned by exactly one browser session: the storefront
//! reads it out of the session store, mutates it in place, and writes
//! it back. Invariants maintained by every operation:
//!
//! - each distinct product appears in at most one line item
//! - every line item has quantity >= 1 (reaching 0 removes the line)
//! - `totals` and `formatted_totals` always reflect the current items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Locale, ProductId};

/// One product entry in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price captured at the time the item was added.
    pub price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl LineItem {
    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.subtotal = self.price * Decimal::from(quantity);
    }
}

/// A visitor's pending purchase selection.
///
/// Items keep insertion order, which is also display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<LineItem>,
    pub totals: Decimal,
    pub formatted_totals: String,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product` to the cart.
    ///
    /// If the product already has a line item its quantity is
    /// incremented; otherwise a new line item is appended. Totals are
    /// recomputed afterwards. Passing `None` (an upstream lookup that
    /// found nothing) or a zero quantity leaves the cart untouched.
    pub fn add(&mut self, product: Option<&Product>, quantity: u32, locale: &Locale) {
        let Some(product) = product else { return };
        if quantity == 0 {
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id)
        {
            Some(item) => {
                let merged = item.quantity.saturating_add(quantity);
                item.set_quantity(merged);
            }
            None => {
                let mut item = LineItem {
                    product_id: product.product_id,
                    name: product.name.clone(),
                    price: product.price,
                    quantity,
                    subtotal: Decimal::ZERO,
                };
                item.set_quantity(quantity);
                self.items.push(item);
            }
        }

        self.recalculate(locale);
    }

    /// Apply new quantities to existing line items.
    ///
    /// `product_ids` and `quantities` are parallel sequences, one pair
    /// per submitted form row. A quantity >= 1 replaces the matching
    /// line's quantity; a quantity <= 0 removes the line. Identifiers
    /// with no matching line item are silently ignored. Totals are
    /// recomputed once after all pairs are processed.
    pub fn update(&mut self, product_ids: &[ProductId], quantities: &[i64], locale: &Locale) {
        for (&product_id, &quantity) in product_ids.iter().zip(quantities) {
            match u32::try_from(quantity) {
                Ok(quantity) if quantity >= 1 => {
                    if let Some(item) = self
                        .items
                        .iter_mut()
                        .find(|item| item.product_id == product_id)
                    {
                        item.set_quantity(quantity);
                    }
                }
                _ => self.items.retain(|item| item.product_id != product_id),
            }
        }

        self.recalculate(locale);
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn recalculate(&mut self, locale: &Locale) {
        self.totals = self.items.iter().map(|item| item.subtotal).sum();
        self.formatted_totals = locale.format(self.totals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;

    fn product(id: i32, name: &str, cents: i64) -> Product {
        Product {
            product_id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::new(cents, 2),
            description: None,
            image: None,
        }
    }

    fn locale() -> Locale {
        Locale::new("en-US", Currency::USD)
    }

    #[test]
    fn add_to_empty_cart_creates_one_line() {
        let mut cart = Cart::new();
        cart.add(Some(&product(42, "Widget", 999)), 3, &locale());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.totals, Decimal::new(2997, 2));
        assert_eq!(cart.formatted_totals, "$29.97");
    }

    #[test]
    fn adding_same_product_twice_aggregates_quantity() {
        let mut cart = Cart::new();
        let widget = product(42, "Widget", 999);
        cart.add(Some(&widget), 2, &locale());
        cart.add(Some(&widget), 3, &locale());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].subtotal, Decimal::new(4995, 2));
        assert_eq!(cart.totals, Decimal::new(4995, 2));
    }

    #[test]
    fn distinct_products_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "First", 100)), 1, &locale());
        cart.add(Some(&product(2, "Second", 200)), 1, &locale());

        assert_eq!(cart.items[0].name, "First");
        assert_eq!(cart.items[1].name, "Second");
        assert_eq!(cart.totals, Decimal::new(300, 2));
    }

    #[test]
    fn add_with_missing_product_is_a_noop() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "Widget", 100)), 1, &locale());
        let before = cart.clone();

        cart.add(None, 5, &locale());

        assert_eq!(cart, before);
    }

    #[test]
    fn add_with_zero_quantity_is_a_noop() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "Widget", 100)), 0, &locale());
        assert!(cart.is_empty());
    }

    #[test]
    fn update_to_zero_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "Widget", 500)), 2, &locale());
        cart.add(Some(&product(2, "Gadget", 300)), 1, &locale());

        cart.update(&[ProductId::new(1)], &[0], &locale());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items[0].product_id, ProductId::new(2));
        assert_eq!(cart.totals, Decimal::new(300, 2));
        assert_eq!(cart.formatted_totals, "$3.00");
    }

    #[test]
    fn update_with_negative_quantity_removes_the_line() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "Widget", 500)), 2, &locale());

        cart.update(&[ProductId::new(1)], &[-3], &locale());

        assert!(cart.is_empty());
        assert_eq!(cart.totals, Decimal::ZERO);
    }

    #[test]
    fn update_replaces_quantity_and_recomputes_subtotal() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "Widget", 250)), 1, &locale());

        cart.update(&[ProductId::new(1)], &[4], &locale());

        assert_eq!(cart.items[0].quantity, 4);
        assert_eq!(cart.items[0].subtotal, Decimal::new(1000, 2));
        assert_eq!(cart.formatted_totals, "$10.00");
    }

    #[test]
    fn update_with_unknown_id_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "Widget", 500)), 2, &locale());
        let before = cart.clone();

        cart.update(&[ProductId::new(99)], &[7], &locale());

        assert_eq!(cart, before);
    }

    #[test]
    fn update_processes_all_pairs() {
        let mut cart = Cart::new();
        cart.add(Some(&product(1, "A", 100)), 1, &locale());
        cart.add(Some(&product(2, "B", 200)), 1, &locale());
        cart.add(Some(&product(3, "C", 300)), 1, &locale());

        cart.update(
            &[ProductId::new(1), ProductId::new(2), ProductId::new(3)],
            &[2, 0, 3],
            &locale(),
        );

        assert_eq!(cart.len(), 2);
        // 2 x 1.00 + 3 x 3.00
        assert_eq!(cart.totals, Decimal::new(1100, 2));
    }

    #[test]
    fn empty_cart_formats_totals_when_updated() {
        let mut cart = Cart::new();
        cart.update(&[], &[], &locale());
        assert_eq!(cart.formatted_totals, "$0.00");
    }
}
