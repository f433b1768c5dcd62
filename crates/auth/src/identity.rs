//! Verified user identity and the snapshots other records copy from it.

use serde::{Deserialize, Serialize};

use medimart_core::{DomainError, UserId};

use crate::{Principal, Role};

/// Minimum number of digits accepted for a sign-in phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// A sign-in phone number (digits only, at least [`MIN_PHONE_DIGITS`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse user input, ignoring spaces and dashes.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let digits: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if digits.is_empty() {
            return Err(DomainError::validation("phone number is required"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation("phone number must contain digits only"));
        }
        if digits.len() < MIN_PHONE_DIGITS {
            return Err(DomainError::validation(format!(
                "phone number must have at least {MIN_PHONE_DIGITS} digits"
            )));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl core::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed-in user.
///
/// This is also the persisted session record, hence the camelCase wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: PhoneNumber,
    pub role: Role,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Identity {
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }

    pub fn contact(&self) -> ContactSnapshot {
        ContactSnapshot {
            id: self.id,
            name: self.name.clone(),
            phone: self.phone.as_str().to_string(),
            email: self.email.clone(),
        }
    }
}

/// Denormalized copy of a customer's contact details.
///
/// Orders and tickets keep this snapshot; later profile changes never flow
/// back into existing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_ten_digits_with_separators() {
        let phone = PhoneNumber::parse("98765 43-210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn phone_rejects_short_or_non_numeric_input() {
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("12345").is_err());
        assert!(PhoneNumber::parse("98765abcde").is_err());
    }

    #[test]
    fn identity_serializes_with_session_field_names() {
        let identity = Identity {
            id: UserId::new(),
            name: "Demo Customer".to_string(),
            email: "customer@demo.com".to_string(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            role: Role::Customer,
            is_verified: true,
            address: Some("Patna, Bihar".to_string()),
        };

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["isVerified"], true);
        assert_eq!(json["role"], "CUSTOMER");
        assert_eq!(json["phone"], "9876543210");

        let back: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn invalid_phone_in_stored_record_fails_to_load() {
        let json = serde_json::json!({
            "id": UserId::new(),
            "name": "x",
            "email": "x@y.z",
            "phone": "123",
            "role": "ADMIN",
            "isVerified": true
        });
        assert!(serde_json::from_value::<Identity>(json).is_err());
    }
}
