//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront amounts are in US dollars. Arithmetic happens on
//! [`rust_decimal::Decimal`] so that totals like `(49.99 + 10 + 39.99) × 2`
//! come out as exactly `199.96`.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in US dollars.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a price from a decimal dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the price is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Apply a whole-number percentage, rounded half away from zero to cents.
    ///
    /// ```
    /// use photoart_core::Price;
    ///
    /// assert_eq!(Price::from_cents(10_000).percent(8), Price::from_cents(800));
    /// ```
    #[must_use]
    pub fn percent(&self, percent: u32) -> Self {
        let rate = Decimal::from(percent) / Decimal::ONE_HUNDRED;
        Self((self.0 * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(4999).to_string(), "$49.99");
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_sum_and_multiply_are_exact() {
        let unit: Price = [4999, 1000, 3999, 0]
            .into_iter()
            .map(Price::from_cents)
            .sum();
        assert_eq!(unit * 2, Price::from_cents(19996));
    }

    #[test]
    fn test_percent_rounds_to_cents() {
        // 8% of $79.99 = 6.3992
        assert_eq!(Price::from_cents(7999).percent(8), Price::from_cents(640));
        assert_eq!(Price::ZERO.percent(8), Price::ZERO);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Price::from_cents(1299)).unwrap();
        assert_eq!(json, "\"12.99\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::from_cents(1299));
    }
}
