//! Shopping cart.
//!
//! The cart is session-local: it lives only as long as the visitor's session
//! and is never persisted elsewhere.

use serde::{Deserialize, Serialize};

use crate::print::{PrintCustomization, Quantity};
use crate::types::{CartItemId, PhotoId, Price};

/// Flat shipping charged on any non-empty cart.
pub const CART_SHIPPING_CENTS: i64 = 1299;
/// Sales tax percentage applied to the subtotal.
pub const TAX_PERCENT: u32 = 8;

/// One customized print in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub photo_id: PhotoId,
    pub photo_title: String,
    pub photo_url: String,
    pub customization: PrintCustomization,
}

impl CartItem {
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.customization.quantity
    }

    #[must_use]
    pub fn unit_price(&self) -> Price {
        self.customization.unit_price()
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.customization.total_price()
    }
}

/// Cart totals as shown in the cart drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines in the cart (the badge count).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total number of prints across all lines.
    #[must_use]
    pub fn print_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity().get()).sum()
    }

    /// Append a confirmed customization as a new line and return its ID.
    pub fn add(
        &mut self,
        photo_id: PhotoId,
        photo_title: impl Into<String>,
        photo_url: impl Into<String>,
        customization: PrintCustomization,
    ) -> CartItemId {
        let id = CartItemId::generate();
        self.items.push(CartItem {
            id: id.clone(),
            photo_id,
            photo_title: photo_title.into(),
            photo_url: photo_url.into(),
            customization,
        });
        id
    }

    /// Remove a line. Returns `false` if it was not in the cart.
    pub fn remove(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id.as_str() != item_id);
        self.items.len() != before
    }

    /// Set a line's quantity. Returns `false` if the line does not exist.
    pub fn set_quantity(&mut self, item_id: &str, quantity: Quantity) -> bool {
        self.item_mut(item_id).is_some_and(|item| {
            item.customization.quantity = quantity;
            true
        })
    }

    /// Add one print to a line, stopping at the maximum quantity.
    pub fn increment(&mut self, item_id: &str) -> bool {
        self.item_mut(item_id).is_some_and(|item| {
            item.customization.quantity = item.customization.quantity.increment();
            true
        })
    }

    /// Remove one print from a line, never going below one.
    pub fn decrement(&mut self, item_id: &str) -> bool {
        self.item_mut(item_id).is_some_and(|item| {
            item.customization.quantity = item.customization.quantity.decrement();
            true
        })
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Subtotal, flat shipping (free when empty), tax, and grand total.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        let shipping = if self.is_empty() {
            Price::ZERO
        } else {
            Price::from_cents(CART_SHIPPING_CENTS)
        };
        let tax = subtotal.percent(TAX_PERCENT);
        CartTotals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    fn item_mut(&mut self, item_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.id.as_str() == item_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::print::PrintSelection;

    fn customization(quantity: i64) -> PrintCustomization {
        PrintCustomization::from(PrintSelection {
            quantity,
            ..PrintSelection::default()
        })
    }

    fn cart_with(quantities: &[i64]) -> (Cart, Vec<CartItemId>) {
        let mut cart = Cart::new();
        let ids = quantities
            .iter()
            .map(|&q| cart.add(PhotoId::new("photo-1"), "Mountain Landscape", "url", customization(q)))
            .collect();
        (cart, ids)
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let totals = Cart::new().totals();
        assert_eq!(totals.shipping, Price::ZERO);
        assert_eq!(totals.total, Price::ZERO);
    }

    #[test]
    fn test_totals() {
        // Default customization is Medium + Matte = $49.99
        let (cart, _) = cart_with(&[2, 1]);
        let totals = cart.totals();
        assert_eq!(totals.subtotal, Price::from_cents(14997));
        assert_eq!(totals.shipping, Price::from_cents(1299));
        assert_eq!(totals.tax, Price::from_cents(1200));
        assert_eq!(totals.total, Price::from_cents(14997 + 1299 + 1200));
    }

    #[test]
    fn test_add_appends_separate_lines() {
        let (cart, ids) = cart_with(&[1, 1]);
        assert_eq!(cart.line_count(), 2);
        assert_ne!(ids.first(), ids.get(1));
        assert_eq!(cart.print_count(), 2);
    }

    #[test]
    fn test_remove() {
        let (mut cart, ids) = cart_with(&[1, 3]);
        assert!(cart.remove(ids.first().unwrap().as_str()));
        assert!(!cart.remove("missing"));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.print_count(), 3);
    }

    #[test]
    fn test_quantity_adjustments_stay_in_bounds() {
        let (mut cart, ids) = cart_with(&[1]);
        let id = ids.first().unwrap().as_str();
        assert!(cart.decrement(id));
        assert_eq!(cart.print_count(), 1);
        for _ in 0..20 {
            cart.increment(id);
        }
        assert_eq!(cart.print_count(), 10);
        assert!(cart.set_quantity(id, Quantity::new(4).unwrap()));
        assert_eq!(cart.subtotal(), Price::from_cents(4999) * 4);
        assert!(!cart.increment("missing"));
    }

    #[test]
    fn test_session_roundtrip_keeps_customization() {
        let (cart, _) = cart_with(&[3]);
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
        assert_eq!(back.subtotal(), cart.subtotal());
    }
}
