//! Contact step: customer details plus mailing and billing addresses.

use serde::{Deserialize, Serialize};

use crate::types::validation::trimmed_len;
use crate::types::{Email, FieldErrors};

pub const DEFAULT_COUNTRY: &str = "United States";

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

impl Address {
    /// Validate an address, reporting problems under `{prefix}{field}` keys.
    fn validate(&self, prefix: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(trimmed_len(&self.street) >= 1, "street", "Street address is required.");
        errors.check(trimmed_len(&self.city) >= 1, "city", "City is required.");
        errors.check(trimmed_len(&self.state) >= 1, "state", "State is required.");
        errors.check(trimmed_len(&self.zip_code) >= 5, "zip_code", "Zip code is required.");
        errors.check(trimmed_len(&self.country) >= 1, "country", "Country is required.");
        errors.prefixed(prefix)
    }

    fn trimmed(&self) -> Self {
        Self {
            street: self.street.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            zip_code: self.zip_code.trim().to_owned(),
            country: self.country.trim().to_owned(),
        }
    }

    /// `City, State Zip`
    #[must_use]
    pub fn locality(&self) -> String {
        format!("{}, {} {}", self.city, self.state, self.zip_code)
    }
}

/// Raw contact form input, as posted by the browser.
///
/// Field names double as the keys of the returned [`FieldErrors`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub mailing_street: String,
    #[serde(default)]
    pub mailing_city: String,
    #[serde(default)]
    pub mailing_state: String,
    #[serde(default)]
    pub mailing_zip_code: String,
    #[serde(default)]
    pub mailing_country: String,
    /// Checkbox: present (any value) when checked.
    #[serde(default)]
    pub same_as_mailing: Option<String>,
    #[serde(default)]
    pub billing_street: String,
    #[serde(default)]
    pub billing_city: String,
    #[serde(default)]
    pub billing_state: String,
    #[serde(default)]
    pub billing_zip_code: String,
    #[serde(default)]
    pub billing_country: String,
}

/// Validated contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub mailing: Address,
    pub billing: Address,
    pub same_as_mailing: bool,
}

impl ContactDetails {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl ContactForm {
    /// A blank form with the default country filled in.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            mailing_country: DEFAULT_COUNTRY.to_owned(),
            billing_country: DEFAULT_COUNTRY.to_owned(),
            ..Self::default()
        }
    }

    /// Pre-fill the form from previously accepted details.
    #[must_use]
    pub fn from_details(details: &ContactDetails) -> Self {
        Self {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            email: details.email.to_string(),
            phone: details.phone.clone(),
            mailing_street: details.mailing.street.clone(),
            mailing_city: details.mailing.city.clone(),
            mailing_state: details.mailing.state.clone(),
            mailing_zip_code: details.mailing.zip_code.clone(),
            mailing_country: details.mailing.country.clone(),
            same_as_mailing: details.same_as_mailing.then(|| "on".to_owned()),
            billing_street: details.billing.street.clone(),
            billing_city: details.billing.city.clone(),
            billing_state: details.billing.state.clone(),
            billing_zip_code: details.billing.zip_code.clone(),
            billing_country: details.billing.country.clone(),
        }
    }

    #[must_use]
    pub const fn same_as_mailing(&self) -> bool {
        self.same_as_mailing.is_some()
    }

    fn mailing(&self) -> Address {
        Address {
            street: self.mailing_street.clone(),
            city: self.mailing_city.clone(),
            state: self.mailing_state.clone(),
            zip_code: self.mailing_zip_code.clone(),
            country: self.mailing_country.clone(),
        }
    }

    fn billing(&self) -> Address {
        Address {
            street: self.billing_street.clone(),
            city: self.billing_city.clone(),
            state: self.billing_state.clone(),
            zip_code: self.billing_zip_code.clone(),
            country: self.billing_country.clone(),
        }
    }

    /// Validate every field.
    ///
    /// With "same as mailing" checked the billing fields are ignored and the
    /// billing address is an exact copy of the mailing address.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<ContactDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(
            trimmed_len(&self.first_name) >= 2,
            "first_name",
            "First name must be at least 2 characters.",
        );
        errors.check(
            trimmed_len(&self.last_name) >= 2,
            "last_name",
            "Last name must be at least 2 characters.",
        );
        let email = Email::parse(&self.email);
        errors.check(email.is_ok(), "email", "Please enter a valid email address.");
        errors.check(
            trimmed_len(&self.phone) >= 10,
            "phone",
            "Please enter a valid phone number.",
        );

        let mailing = self.mailing();
        errors.extend(mailing.validate("mailing_"));

        let same_as_mailing = self.same_as_mailing();
        let billing = if same_as_mailing {
            None
        } else {
            let billing = self.billing();
            errors.extend(billing.validate("billing_"));
            Some(billing)
        };

        match email {
            Ok(email) if errors.is_empty() => {
                let mailing = mailing.trimmed();
                let billing = billing.map_or_else(|| mailing.clone(), |b| b.trimmed());
                Ok(ContactDetails {
                    first_name: self.first_name.trim().to_owned(),
                    last_name: self.last_name.trim().to_owned(),
                    email,
                    phone: self.phone.trim().to_owned(),
                    mailing,
                    billing,
                    same_as_mailing,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "555-010-2030".to_owned(),
            mailing_street: "12 Analytical Way".to_owned(),
            mailing_city: "London".to_owned(),
            mailing_state: "LDN".to_owned(),
            mailing_zip_code: "10001".to_owned(),
            mailing_country: "United Kingdom".to_owned(),
            same_as_mailing: Some("on".to_owned()),
            ..ContactForm::blank()
        }
    }

    #[test]
    fn test_blank_defaults_country() {
        let form = ContactForm::blank();
        assert_eq!(form.mailing_country, "United States");
        assert_eq!(form.billing_country, "United States");
    }

    #[test]
    fn test_same_as_mailing_copies_address_exactly() {
        let details = valid_form().validate().unwrap();
        assert!(details.same_as_mailing);
        assert_eq!(details.billing, details.mailing);
        assert_eq!(details.billing.street, "12 Analytical Way");
    }

    #[test]
    fn test_same_as_mailing_ignores_stale_billing_fields() {
        let mut form = valid_form();
        form.billing_street = "Somewhere else".to_owned();
        form.billing_zip_code = "1".to_owned();
        let details = form.validate().unwrap();
        assert_eq!(details.billing, details.mailing);
    }

    #[test]
    fn test_separate_billing_is_validated() {
        let mut form = valid_form();
        form.same_as_mailing = None;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("billing_street"), Some("Street address is required."));
        assert_eq!(errors.get("billing_zip_code"), Some("Zip code is required."));
        assert_eq!(errors.get("billing_country"), None);
    }

    #[test]
    fn test_field_messages() {
        let form = ContactForm {
            first_name: "A".to_owned(),
            last_name: " ".to_owned(),
            email: "not-an-email".to_owned(),
            phone: "12345".to_owned(),
            mailing_zip_code: "123".to_owned(),
            mailing_country: String::new(),
            same_as_mailing: Some("on".to_owned()),
            ..ContactForm::blank()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("first_name"), Some("First name must be at least 2 characters."));
        assert_eq!(errors.get("last_name"), Some("Last name must be at least 2 characters."));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address."));
        assert_eq!(errors.get("phone"), Some("Please enter a valid phone number."));
        assert_eq!(errors.get("mailing_city"), Some("City is required."));
        assert_eq!(errors.get("mailing_zip_code"), Some("Zip code is required."));
        assert_eq!(errors.get("mailing_country"), Some("Country is required."));
    }

    #[test]
    fn test_roundtrip_through_form() {
        let details = valid_form().validate().unwrap();
        let again = ContactForm::from_details(&details).validate().unwrap();
        assert_eq!(again, details);
    }
}
