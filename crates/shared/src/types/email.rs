//! Validated email address type.
//!
//! An `EmailAddress` can only be constructed from a string that passes the
//! address-shape check, so downstream code never has to re-validate.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::AppError;

/// An email address that has passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and validates an email address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidEmail` if the value does not look like an
    /// email address.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let trimmed = value.trim();
        // The HTML5 rule accepts dotless domains; employee addresses always
        // carry a TLD, so require one on top of the shape check.
        let dotted_domain = trimmed
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'));
        if trimmed.validate_email() && dotted_domain {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(AppError::InvalidEmail(value.to_string()))
        }
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("joe@doe.com")]
    #[case("jim.halpert@dunder-mifflin.com")]
    #[case("  padded@example.org  ")]
    fn test_valid_addresses(#[case] input: &str) {
        let email = EmailAddress::parse(input).unwrap();
        assert_eq!(email.as_str(), input.trim());
    }

    #[rstest]
    #[case("")]
    #[case("not-an-email")]
    #[case("missing@domain")]
    #[case("@nouser.com")]
    fn test_invalid_addresses(#[case] input: &str) {
        assert!(matches!(
            EmailAddress::parse(input),
            Err(AppError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let email = EmailAddress::parse("joe@doe.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"joe@doe.com\"");

        let back: EmailAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, email);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<EmailAddress, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
