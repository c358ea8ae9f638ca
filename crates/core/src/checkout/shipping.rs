//! Shipping method, packing, and insurance choices.

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Delivery speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Overnight,
}

impl ShippingMethod {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::Overnight];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Shipping",
            Self::Express => "Express Shipping",
            Self::Overnight => "Overnight Shipping",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Standard => "Delivery in 5-7 business days",
            Self::Express => "Delivery in 2-3 business days",
            Self::Overnight => "Delivery by next business day",
        }
    }

    #[must_use]
    pub fn price(self) -> Price {
        Price::from_cents(match self {
            Self::Standard => 999,
            Self::Express => 1999,
            Self::Overnight => 2999,
        })
    }

    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }
}

/// Packaging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingOption {
    #[default]
    Standard,
    Premium,
    Gift,
}

impl PackingOption {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Premium, Self::Gift];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Gift => "gift",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Standard Packing",
            Self::Premium => "Premium Packing",
            Self::Gift => "Gift Wrapping",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Standard => "Basic protective packaging",
            Self::Premium => "Extra protection with premium materials",
            Self::Gift => "Elegant gift wrapping with a personalized note",
        }
    }

    #[must_use]
    pub fn price(self) -> Price {
        Price::from_cents(match self {
            Self::Standard => 0,
            Self::Premium => 599,
            Self::Gift => 999,
        })
    }

    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

/// Shipping insurance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceOption {
    None,
    #[default]
    Basic,
    Premium,
}

impl InsuranceOption {
    pub const ALL: [Self; 3] = [Self::None, Self::Basic, Self::Premium];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "No Insurance",
            Self::Basic => "Basic Insurance",
            Self::Premium => "Premium Insurance",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "No additional coverage",
            Self::Basic => "Coverage up to $100",
            Self::Premium => "Coverage up to $500",
        }
    }

    #[must_use]
    pub fn price(self) -> Price {
        Price::from_cents(match self {
            Self::None => 0,
            Self::Basic => 499,
            Self::Premium => 1299,
        })
    }

    /// Maximum insured value.
    #[must_use]
    pub fn coverage(self) -> Price {
        Price::from_cents(match self {
            Self::None => 0,
            Self::Basic => 10_000,
            Self::Premium => 50_000,
        })
    }

    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.id() == id)
    }
}

/// Formats a fee, with `Free` for zero.
#[must_use]
pub fn fee_label(price: Price) -> String {
    if price.is_zero() {
        "Free".to_owned()
    } else {
        price.to_string()
    }
}

/// The shipping step's choices. Defaults to standard shipping, standard
/// packing, and basic insurance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSelection {
    pub method: ShippingMethod,
    pub packing: PackingOption,
    pub insurance: InsuranceOption,
}

impl ShippingSelection {
    /// Delivery charge: method plus packing.
    #[must_use]
    pub fn delivery_cost(&self) -> Price {
        self.method.price() + self.packing.price()
    }
}
