//! Per-field form validation errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Validation messages keyed by form field name.
///
/// Forms render each message next to its field, so a failed submission keeps
/// every problem visible at once instead of stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message for a field. The first message for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record `message` for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Prefix every field name, for nesting a sub-form's errors.
    #[must_use]
    pub fn prefixed(self, prefix: &str) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|(k, v)| (format!("{prefix}{k}"), v))
                .collect(),
        )
    }

    /// Merge another error set into this one.
    pub fn extend(&mut self, other: Self) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error set itself when any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Length of `s` in characters after trimming surrounding whitespace.
#[must_use]
pub fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_check_only_records_failures() {
        let mut errors = FieldErrors::new();
        errors.check(true, "name", "bad name");
        errors.check(false, "phone", "bad phone");
        assert_eq!(errors.get("name"), None);
        assert_eq!(errors.get("phone"), Some("bad phone"));
    }

    #[test]
    fn test_prefixed_and_extend() {
        let mut inner = FieldErrors::new();
        inner.add("city", "City is required.");
        let mut outer = FieldErrors::new();
        outer.extend(inner.prefixed("billing_"));
        assert_eq!(outer.get("billing_city"), Some("City is required."));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));
        let mut errors = FieldErrors::new();
        errors.add("zip", "Zip code is required.");
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_trimmed_len_counts_chars() {
        assert_eq!(trimmed_len("  Zoë  "), 3);
        assert_eq!(trimmed_len("   "), 0);
    }
}
