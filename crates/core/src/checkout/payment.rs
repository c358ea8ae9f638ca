//! Payment method selection and the simulated payment failure.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    WireTransfer,
}

impl PaymentMethod {
    pub const ALL: [Self; 2] = [Self::CreditCard, Self::WireTransfer];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::WireTransfer => "wire_transfer",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::WireTransfer => "Wire Transfer",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreditCard => "Pay securely with your credit card via Stripe",
            Self::WireTransfer => "Pay via bank wire transfer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| UnknownPaymentMethod(s.to_owned()))
    }
}

/// Bank details shown when paying by wire transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireTransferDetails {
    pub bank_name: &'static str,
    pub account_name: &'static str,
    pub account_number: &'static str,
    pub routing_number: &'static str,
    pub swift_code: &'static str,
}

pub const WIRE_TRANSFER_DETAILS: WireTransferDetails = WireTransferDetails {
    bank_name: "International Bank",
    account_name: "Photography Store Inc.",
    account_number: "XXXX-XXXX-XXXX-1234",
    routing_number: "123456789",
    swift_code: "INTLBANK123",
};

/// A failed payment attempt shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    pub message: String,
    pub code: String,
}

impl PaymentError {
    pub const FAILED_CODE: &'static str = "ERR_PAYMENT_FAILED";

    /// The canned failure used to exercise the error path.
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            message: "Your payment could not be processed at this time.".to_owned(),
            code: Self::FAILED_CODE.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_credit_card() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CreditCard);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "wire_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::WireTransfer
        );
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_simulated_error() {
        let err = PaymentError::simulated();
        assert_eq!(err.code, "ERR_PAYMENT_FAILED");
        assert!(err.message.contains("could not be processed"));
    }
}
