//! Customer account data: the signed-in user, order history, and the
//! profile and site contact forms.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::checkout::{Order, estimated_delivery};
use crate::types::validation::trimmed_len;
use crate::types::{Email, FieldErrors, Price, UserId};

/// The identity service's view of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// Name to greet the user with, falling back to `User`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("User")
    }

    /// Avatar fallback: the first letter of each name word, or the first two
    /// letters of the email address when there is no name.
    #[must_use]
    pub fn initials(&self) -> String {
        match self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => name
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .flat_map(char::to_uppercase)
                .collect(),
            None => self
                .email
                .chars()
                .take(2)
                .flat_map(char::to_uppercase)
                .collect(),
        }
    }
}

/// Fulfilment state of a past order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS modifier for the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Processing => "badge-processing",
            Self::Shipped => "badge-shipped",
            Self::Delivered => "badge-delivered",
            Self::Cancelled => "badge-cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the order history page shows for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub number: String,
    pub placed_on: NaiveDate,
    pub status: OrderStatus,
    pub total: Price,
    pub item_count: u32,
}

impl OrderHistoryEntry {
    /// `Delivered` or `Cancelled` for finished orders, otherwise the
    /// estimated delivery date.
    #[must_use]
    pub fn estimated_delivery(&self) -> String {
        match self.status {
            OrderStatus::Delivered | OrderStatus::Cancelled => self.status.label().to_owned(),
            OrderStatus::Processing | OrderStatus::Shipped => estimated_delivery(self.placed_on)
                .format("%-m/%-d/%Y")
                .to_string(),
        }
    }

    #[must_use]
    pub fn placed_on_display(&self) -> String {
        self.placed_on.format("%-m/%-d/%Y").to_string()
    }
}

impl From<&Order> for OrderHistoryEntry {
    fn from(order: &Order) -> Self {
        Self {
            number: order.number.clone(),
            placed_on: order.placed_on(),
            status: order.status,
            total: order.summary.total,
            item_count: order.item_count(),
        }
    }
}

/// Orders shown to the demo account.
#[must_use]
pub fn sample_order_history() -> Vec<OrderHistoryEntry> {
    let entry = |number: &str, (y, m, d): (i32, u32, u32), status, cents, item_count| {
        NaiveDate::from_ymd_opt(y, m, d).map(|placed_on| OrderHistoryEntry {
            number: number.to_owned(),
            placed_on,
            status,
            total: Price::from_cents(cents),
            item_count,
        })
    };
    [
        entry("ORD-12345", (2023, 6, 15), OrderStatus::Delivered, 12999, 2),
        entry("ORD-12346", (2023, 7, 22), OrderStatus::Shipped, 8999, 1),
        entry("ORD-12347", (2023, 8, 5), OrderStatus::Processing, 19999, 3),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Profile edit form. Only the name can change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns a `name` error for names shorter than two characters.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            trimmed_len(&self.name) >= 2,
            "name",
            "Name must be at least 2 characters",
        );
        errors.into_result(self.name.trim().to_owned())
    }
}

/// Message sent through the site contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// Every field is required and the email must be valid.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<Email, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(trimmed_len(&self.name) >= 1, "name", "Name is required.");
        let email = Email::parse(&self.email);
        errors.check(email.is_ok(), "email", "Please enter a valid email address.");
        errors.check(trimmed_len(&self.subject) >= 1, "subject", "Subject is required.");
        errors.check(trimmed_len(&self.message) >= 1, "message", "Message is required.");
        match email {
            Ok(email) if errors.is_empty() => Ok(email),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> User {
        User {
            id: UserId::new("1"),
            email: "user@example.com".to_owned(),
            name: name.map(str::to_owned),
            avatar_url: None,
        }
    }

    #[test]
    fn test_initials_from_name() {
        assert_eq!(user(Some("Test User")).initials(), "TU");
        assert_eq!(user(Some("ada  lovelace byron")).initials(), "ALB");
    }

    #[test]
    fn test_initials_from_email() {
        assert_eq!(user(None).initials(), "US");
        assert_eq!(user(Some("  ")).initials(), "US");
        assert_eq!(user(None).display_name(), "User");
    }

    #[test]
    fn test_estimated_delivery_text() {
        let history = sample_order_history();
        assert_eq!(history.len(), 3);
        let by_number = |n: &str| history.iter().find(|e| e.number == n).unwrap();
        assert_eq!(by_number("ORD-12345").estimated_delivery(), "Delivered");
        assert_eq!(by_number("ORD-12346").estimated_delivery(), "7/29/2023");
        assert_eq!(by_number("ORD-12347").estimated_delivery(), "8/12/2023");
    }

    #[test]
    fn test_cancelled_shows_cancelled() {
        let entry = OrderHistoryEntry {
            number: "ORD-99999".to_owned(),
            placed_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: OrderStatus::Cancelled,
            total: Price::ZERO,
            item_count: 1,
        };
        assert_eq!(entry.estimated_delivery(), "Cancelled");
    }

    #[test]
    fn test_profile_name_length() {
        let short = ProfileForm { name: "A".to_owned() };
        assert_eq!(
            short.validate().unwrap_err().get("name"),
            Some("Name must be at least 2 characters")
        );
        let ok = ProfileForm { name: " Al ".to_owned() };
        assert_eq!(ok.validate().unwrap(), "Al");
    }

    #[test]
    fn test_contact_message_requires_all_fields() {
        let errors = ContactMessage::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);

        let message = ContactMessage {
            name: "Jo".to_owned(),
            email: "jo@example.com".to_owned(),
            subject: "Print inquiry".to_owned(),
            message: "Do you ship to Canada?".to_owned(),
        };
        assert_eq!(message.validate().unwrap().as_str(), "jo@example.com");
    }
}
