//! Customer profile documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::types::{Email, UserRole};

/// A customer profile from the `users` collection, keyed by the auth
/// provider's user id.
///
/// The saved address prefills checkout; `display_address` is the
/// composed single-line form kept alongside it for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: Email,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub display_address: String,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// A fresh profile for a newly registered user.
    #[must_use]
    pub fn new(email: Email, display_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            email,
            display_name: display_name.into(),
            phone: String::new(),
            address: None,
            display_address: String::new(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account can use the back office.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Store the saved address and refresh its composed display form.
    pub fn set_address(&mut self, address: Address, now: DateTime<Utc>) {
        self.display_address = address.display();
        self.address = Some(address);
        self.updated_at = now;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let now = Utc::now();
        let profile = UserProfile::new(Email::parse("ana@example.com").unwrap(), "Ana", now);
        assert_eq!(profile.role, UserRole::User);
        assert!(!profile.is_admin());
        assert!(profile.address.is_none());
    }

    #[test]
    fn test_set_address_composes_display_form() {
        let now = Utc::now();
        let mut profile = UserProfile::new(Email::parse("ana@example.com").unwrap(), "Ana", now);
        profile.set_address(
            Address {
                street: "Belgrano".to_owned(),
                street_number: "742".to_owned(),
                between_streets: None,
                city: "Rosario".to_owned(),
                province: "Santa Fe".to_owned(),
                postal_code: "2000".to_owned(),
            },
            now,
        );
        assert_eq!(
            profile.display_address,
            "Belgrano, 742, Rosario, Santa Fe, CP: 2000"
        );
    }
}
