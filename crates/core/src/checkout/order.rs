//! Order summary and confirmation.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::account::OrderStatus;
use crate::cart::{Cart, TAX_PERCENT};
use crate::types::{Email, PhotoId, Price};

use super::shipping::ShippingSelection;

/// Days added to the order date for the delivery estimate.
pub const DELIVERY_ESTIMATE_DAYS: u64 = 7;

/// Price breakdown shown beside the checkout steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub insurance: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Compute the summary for a cart and the chosen shipping options.
    ///
    /// An empty cart ships for free and carries no insurance.
    #[must_use]
    pub fn compute(cart: &Cart, shipping: &ShippingSelection) -> Self {
        let subtotal = cart.subtotal();
        let (shipping_cost, insurance) = if cart.is_empty() {
            (Price::ZERO, Price::ZERO)
        } else {
            (shipping.delivery_cost(), shipping.insurance.price())
        };
        let tax = subtotal.percent(TAX_PERCENT);
        Self {
            subtotal,
            shipping: shipping_cost,
            tax,
            insurance,
            total: subtotal + shipping_cost + tax + insurance,
        }
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub photo_id: PhotoId,
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// A placed order, shown on the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub number: String,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub email: Email,
    pub lines: Vec<OrderLine>,
    pub summary: OrderSummary,
}

impl Order {
    /// Snapshot the cart into an order. The caller supplies the order number.
    #[must_use]
    pub fn place(
        number: impl Into<String>,
        placed_at: DateTime<Utc>,
        email: Email,
        cart: &Cart,
        shipping: &ShippingSelection,
    ) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                photo_id: item.photo_id.clone(),
                name: item.photo_title.clone(),
                image_url: item.photo_url.clone(),
                description: item.customization.summary(),
                quantity: item.quantity().get(),
                unit_price: item.unit_price(),
                line_total: item.line_total(),
            })
            .collect();
        Self {
            number: number.into(),
            placed_at,
            status: OrderStatus::Processing,
            email,
            lines,
            summary: OrderSummary::compute(cart, shipping),
        }
    }

    #[must_use]
    pub fn placed_on(&self) -> NaiveDate {
        self.placed_at.date_naive()
    }

    #[must_use]
    pub fn estimated_delivery(&self) -> NaiveDate {
        estimated_delivery(self.placed_on())
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Order date plus the standard delivery window.
#[must_use]
pub fn estimated_delivery(placed_on: NaiveDate) -> NaiveDate {
    placed_on
        .checked_add_days(Days::new(DELIVERY_ESTIMATE_DAYS))
        .unwrap_or(placed_on)
}

/// Whether a string looks like an order number: `ORD-` then five digits,
/// optionally followed by `-` and four digits.
#[must_use]
pub fn is_order_number(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("ORD-") else {
        return false;
    };
    let all_digits = |part: &str, len: usize| {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    };
    match rest.split_once('-') {
        Some((head, tail)) => all_digits(head, 5) && all_digits(tail, 4),
        None => all_digits(rest, 5),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::shipping::{InsuranceOption, PackingOption, ShippingMethod};
    use crate::print::{PrintCustomization, PrintSelection};

    fn cart_with_one_default_print() -> Cart {
        let mut cart = Cart::new();
        cart.add(
            PhotoId::new("photo-1"),
            "Mountain Landscape",
            "https://images.unsplash.com/photo-1",
            PrintCustomization::from(PrintSelection::default()),
        );
        cart
    }

    #[test]
    fn test_summary_for_empty_cart_is_zero() {
        let summary = OrderSummary::compute(&Cart::new(), &ShippingSelection::default());
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.insurance, Price::ZERO);
        assert_eq!(summary.total, Price::ZERO);
    }

    #[test]
    fn test_summary_adds_shipping_tax_and_insurance() {
        let cart = cart_with_one_default_print();
        let shipping = ShippingSelection {
            method: ShippingMethod::Express,
            packing: PackingOption::Premium,
            insurance: InsuranceOption::Premium,
        };
        let summary = OrderSummary::compute(&cart, &shipping);
        assert_eq!(summary.subtotal, Price::from_cents(4999));
        assert_eq!(summary.shipping, Price::from_cents(1999 + 599));
        assert_eq!(summary.tax, Price::from_cents(400));
        assert_eq!(summary.insurance, Price::from_cents(1299));
        assert_eq!(
            summary.total,
            Price::from_cents(4999 + 1999 + 599 + 400 + 1299)
        );
    }

    #[test]
    fn test_place_snapshots_cart() {
        let cart = cart_with_one_default_print();
        let placed_at = "2024-03-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let order = Order::place(
            "ORD-12345-6789",
            placed_at,
            Email::parse("buyer@example.com").unwrap(),
            &cart,
            &ShippingSelection::default(),
        );
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(
            order.estimated_delivery(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
    }

    #[test]
    fn test_order_number_shape() {
        assert!(is_order_number("ORD-12345-6789"));
        assert!(is_order_number("ORD-12345"));
        assert!(!is_order_number("ORD-1234"));
        assert!(!is_order_number("ORD-12345-67a9"));
        assert!(!is_order_number("12345-6789"));
    }
}
