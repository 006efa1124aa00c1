//! Email Value Object
//!
//! Represents a normalized, validated email address. Normalization (trim,
//! lowercase) happens before validation so that lookups and uniqueness are
//! case-insensitive everywhere.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with normalization and validation
    pub fn new(email: impl AsRef<str>) -> AppResult<Self> {
        let email = Self::normalize(email.as_ref());

        if email.is_empty() {
            return Err(invalid("Email is required"));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(invalid(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(invalid("Invalid email format"));
        }

        Ok(Self(email))
    }

    /// Trim surrounding whitespace and lowercase
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// `local@domain.tld`: local part of `[a-z0-9._%+-]`, domain of
    /// `[a-z0-9.-]` and a final label of at least two letters.
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        let local_ok = !local.is_empty()
            && local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
        if !local_ok {
            return false;
        }

        let Some((host, tld)) = domain.rsplit_once('.') else {
            return false;
        };

        let host_ok = !host.is_empty()
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        host_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to string for database storage
    pub fn into_db(self) -> String {
        self.0
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> AppError {
    AppError::bad_request(message).with_code("validation_error")
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user@example.com")]
    #[case("User@Example.COM")]
    #[case("user.name@example.co.jp")]
    #[case("user+tag@example.com")]
    #[case("first_last%x@sub-domain.example.org")]
    fn test_email_valid(#[case] raw: &str) {
        assert!(Email::new(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("userexample.com")]
    #[case("user@")]
    #[case("@example.com")]
    #[case("user@@example.com")]
    #[case("user@example")]
    #[case("user@example.c")]
    #[case("user@example.c0m")]
    #[case("us er@example.com")]
    #[case("user@exa_mple.com")]
    fn test_email_invalid(#[case] raw: &str) {
        let err = Email::new(raw).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn test_email_too_long() {
        let raw = format!("{}@example.com", "a".repeat(250));
        assert!(Email::new(raw).is_err());
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("  User@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
        assert_eq!(email, Email::new("user@example.com").unwrap());
    }
}
