//! Shipping address and its checkout validation.

use serde::{Deserialize, Serialize};

/// The required address fields, in the order validation reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Street,
    StreetNumber,
    City,
    Province,
    PostalCode,
}

impl AddressField {
    /// Spanish label used in validation messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Street => "calle",
            Self::StreetNumber => "número",
            Self::City => "ciudad",
            Self::Province => "provincia",
            Self::PostalCode => "código postal",
        }
    }
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why an address is not usable for checkout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// A required field is blank (after trimming).
    #[error("el campo {0} es obligatorio")]
    MissingField(AddressField),
    /// All fields are present but the postal code is not 4-5 digits.
    #[error("código postal inválido")]
    InvalidPostalCode,
}

/// A shipping address.
///
/// Five required fields plus optional cross-streets. Postal codes are
/// kept as entered; [`Address::validate`] decides whether the address is
/// usable for cost calculation and order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    pub street: String,
    pub street_number: String,
    /// Cross-streets ("entre calles"), optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between_streets: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl Address {
    /// Validate the address for checkout.
    ///
    /// Required fields are checked in a fixed order (street, street
    /// number, city, province, postal code), short-circuiting on the
    /// first blank one. Only then is the postal-code format checked, so
    /// "missing field" and "invalid postal code" stay distinct errors.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank
    /// field, or [`AddressError::InvalidPostalCode`] if the code is not
    /// 4-5 digits.
    pub fn validate(&self) -> Result<(), AddressError> {
        let required = [
            (AddressField::Street, &self.street),
            (AddressField::StreetNumber, &self.street_number),
            (AddressField::City, &self.city),
            (AddressField::Province, &self.province),
            (AddressField::PostalCode, &self.postal_code),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(field));
            }
        }

        if !is_valid_postal_code(&self.postal_code) {
            return Err(AddressError::InvalidPostalCode);
        }

        Ok(())
    }

    /// Single-line display form, the way the confirmation screen shows it:
    /// `Av. Corrientes, 1234, entre A y B, Buenos Aires, CABA, CP: 1043`.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = vec![self.street.clone(), self.street_number.clone()];
        if let Some(between) = self
            .between_streets
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            parts.push(format!("entre {between}"));
        }
        parts.push(self.city.clone());
        parts.push(self.province.clone());
        if !self.postal_code.is_empty() {
            parts.push(format!("CP: {}", self.postal_code));
        }
        parts.join(", ")
    }
}

/// Postal codes must be 4 or 5 digits (`^\d{4,5}$`).
fn is_valid_postal_code(code: &str) -> bool {
    (4..=5).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_address() -> Address {
        Address {
            street: "Av. Corrientes".to_owned(),
            street_number: "1234".to_owned(),
            between_streets: None,
            city: "Buenos Aires".to_owned(),
            province: "Ciudad Autónoma de Buenos Aires".to_owned(),
            postal_code: "1043".to_owned(),
        }
    }

    #[test]
    fn test_complete_address_is_valid() {
        assert_eq!(complete_address().validate(), Ok(()));
    }

    #[test]
    fn test_five_digit_postal_code_is_valid() {
        let mut addr = complete_address();
        addr.postal_code = "10430".to_owned();
        assert_eq!(addr.validate(), Ok(()));
    }

    #[test]
    fn test_missing_fields_reported_in_fixed_order() {
        let mut addr = complete_address();
        addr.street = "   ".to_owned();
        addr.city = String::new();
        // street comes before city in the fixed order
        assert_eq!(
            addr.validate(),
            Err(AddressError::MissingField(AddressField::Street))
        );

        addr.street = "Av. Corrientes".to_owned();
        assert_eq!(
            addr.validate(),
            Err(AddressError::MissingField(AddressField::City))
        );
    }

    #[test]
    fn test_each_required_field() {
        for field in [
            AddressField::Street,
            AddressField::StreetNumber,
            AddressField::City,
            AddressField::Province,
            AddressField::PostalCode,
        ] {
            let mut addr = complete_address();
            match field {
                AddressField::Street => addr.street = String::new(),
                AddressField::StreetNumber => addr.street_number = String::new(),
                AddressField::City => addr.city = String::new(),
                AddressField::Province => addr.province = String::new(),
                AddressField::PostalCode => addr.postal_code = String::new(),
            }
            assert_eq!(addr.validate(), Err(AddressError::MissingField(field)));
        }
    }

    #[test]
    fn test_invalid_postal_codes() {
        for code in ["123", "123456", "1a34", "C1043"] {
            let mut addr = complete_address();
            addr.postal_code = code.to_owned();
            assert_eq!(addr.validate(), Err(AddressError::InvalidPostalCode));
        }
    }

    #[test]
    fn test_invalid_postal_code_distinct_from_missing() {
        let mut addr = complete_address();
        addr.postal_code = "12".to_owned();
        assert_eq!(addr.validate(), Err(AddressError::InvalidPostalCode));

        addr.postal_code = String::new();
        assert_eq!(
            addr.validate(),
            Err(AddressError::MissingField(AddressField::PostalCode))
        );
    }

    #[test]
    fn test_display_includes_cross_streets() {
        let mut addr = complete_address();
        addr.between_streets = Some("Uruguay y Paraná".to_owned());
        assert_eq!(
            addr.display(),
            "Av. Corrientes, 1234, entre Uruguay y Paraná, Buenos Aires, \
             Ciudad Autónoma de Buenos Aires, CP: 1043"
        );
    }

    #[test]
    fn test_display_skips_blank_cross_streets() {
        let mut addr = complete_address();
        addr.between_streets = Some("  ".to_owned());
        assert!(!addr.display().contains("entre"));
    }
}
