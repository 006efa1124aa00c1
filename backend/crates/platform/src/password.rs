//! Password Policy, Hashing and Verification
//!
//! - bcrypt hashing with a configurable, bounded work factor
//! - Zeroization of clear text on drop
//! - A fixed dummy hash so that "no such user" costs as much as a real check
//!
//! Stored hashes are standard `$2b$` strings, interchangeable with any
//! other bcrypt implementation.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// bcrypt input limit; longer inputs are rejected, never truncated
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Lowest cost accepted from configuration
pub const MIN_COST: u32 = 10;

/// Highest cost accepted from configuration
pub const MAX_COST: u32 = 14;

/// Cost used when configuration is absent or out of range
pub const DEFAULT_COST: u32 = 12;

const DUMMY_PASSWORD: &str = "dummy-password-for-timing-equalization";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password must be at most {max} bytes (got {actual})")]
    TooManyBytes { max: usize, actual: usize },

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one number")]
    MissingDigit,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed (bad cost, RNG failure)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored value is not a bcrypt hash
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Cost policy
// ============================================================================

/// Resolve the configured work factor
///
/// Anything missing, unparsable or outside `MIN_COST..=MAX_COST` falls back
/// to [`DEFAULT_COST`].
pub fn cost_from_config(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|cost| (MIN_COST..=MAX_COST).contains(cost))
        .unwrap_or(DEFAULT_COST)
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`, and Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a password for a new credential, enforcing the policy:
    /// 8 to 128 characters, at most 72 bytes, with at least one uppercase
    /// letter, one lowercase letter and one digit.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let char_count = raw.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if raw.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordPolicyError::TooManyBytes {
                max: MAX_PASSWORD_BYTES,
                actual: raw.len(),
            });
        }

        if !raw.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if !raw.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if !raw.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }

        Ok(Self(raw))
    }

    /// Wrap a candidate password for verification only.
    ///
    /// No policy applies: a login attempt must fail on the hash comparison,
    /// never earlier.
    pub fn for_verification(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash string (`$2b$12$...`, 60 characters)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored hash (e.g., from the database)
    pub fn from_hash_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        let looks_like_bcrypt = hash.len() == 60
            && (hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$"));

        if !looks_like_bcrypt {
            return Err(PasswordHashError::InvalidHashFormat);
        }

        Ok(Self { hash })
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// bcrypt hasher bound to one work factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy: HashedPassword,
}

impl PasswordHasher {
    /// Build a hasher and precompute its dummy hash.
    ///
    /// Fails when bcrypt rejects the cost (outside 4..=31).
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        let dummy = hash_with_cost(DUMMY_PASSWORD, cost)?;
        Ok(Self { cost, dummy })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        hash_with_cost(password.as_str(), self.cost)
    }

    /// Check a candidate against a stored hash
    ///
    /// A malformed stored hash, or a candidate over 72 bytes, counts as a
    /// mismatch.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        bcrypt::non_truncating_verify(password.as_str(), hashed.as_str()).unwrap_or(false)
    }

    /// Spend one comparison against the dummy hash and discard the result
    pub fn verify_dummy(&self, password: &ClearTextPassword) {
        let _ = self.verify(password, &self.dummy);
    }
}

fn hash_with_cost(password: &str, cost: u32) -> Result<HashedPassword, PasswordHashError> {
    let hash = bcrypt::non_truncating_hash(password, cost)
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
    Ok(HashedPassword { hash })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // bcrypt's minimum; keeps the suite fast
    const TEST_COST: u32 = 4;

    #[rstest]
    #[case("Password1")]
    #[case("Sup3rSecret")]
    #[case("aB3aaaaa")]
    fn test_policy_accepts(#[case] raw: &str) {
        assert!(ClearTextPassword::new(raw.to_string()).is_ok());
    }

    #[rstest]
    #[case("password", PasswordPolicyError::MissingUppercase)]
    #[case("PASSWORD1", PasswordPolicyError::MissingLowercase)]
    #[case("Passwordx", PasswordPolicyError::MissingDigit)]
    #[case("Pass1", PasswordPolicyError::TooShort { min: 8, actual: 5 })]
    fn test_policy_rejects(#[case] raw: &str, #[case] expected: PasswordPolicyError) {
        assert_eq!(ClearTextPassword::new(raw.to_string()).unwrap_err(), expected);
    }

    #[test]
    fn test_policy_too_long() {
        let raw = format!("Aa1{}", "x".repeat(MAX_PASSWORD_LENGTH));
        assert!(matches!(
            ClearTextPassword::new(raw),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_policy_rejects_over_bcrypt_limit() {
        let raw = format!("Aa1{}", "x".repeat(70));
        assert_eq!(
            ClearTextPassword::new(raw).unwrap_err(),
            PasswordPolicyError::TooManyBytes { max: 72, actual: 73 }
        );

        // 24 three-byte characters: within the character limit, over the byte limit
        let raw = format!("Aa1{}", "€".repeat(24));
        assert!(matches!(
            ClearTextPassword::new(raw),
            Err(PasswordPolicyError::TooManyBytes { .. })
        ));
    }

    #[test]
    fn test_long_candidates_do_not_match_on_prefix() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let prefix = format!("Aa1{}", "x".repeat(69));
        let password = ClearTextPassword::new(prefix.clone()).unwrap();
        let hashed = hasher.hash(&password).unwrap();

        let longer = ClearTextPassword::for_verification(format!("{}TotallyDifferent", prefix));
        assert!(!hasher.verify(&longer, &hashed));
        assert!(hasher.verify(&password, &hashed));
    }

    #[rstest]
    #[case(None, DEFAULT_COST)]
    #[case(Some("10"), 10)]
    #[case(Some(" 14 "), 14)]
    #[case(Some("9"), DEFAULT_COST)]
    #[case(Some("15"), DEFAULT_COST)]
    #[case(Some("fast"), DEFAULT_COST)]
    fn test_cost_from_config(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(cost_from_config(raw), expected);
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let password = ClearTextPassword::new("Password1".to_string()).unwrap();
        let hashed = hasher.hash(&password).unwrap();

        assert!(hashed.as_str().starts_with("$2b$04$"));
        assert!(hasher.verify(&password, &hashed));

        let wrong = ClearTextPassword::for_verification("Password2".to_string());
        assert!(!hasher.verify(&wrong, &hashed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let password = ClearTextPassword::new("Password1".to_string()).unwrap();
        assert_ne!(hasher.hash(&password).unwrap(), hasher.hash(&password).unwrap());
    }

    #[test]
    fn test_invalid_cost_is_hashing_failure() {
        assert!(matches!(
            PasswordHasher::new(2),
            Err(PasswordHashError::HashingFailed(_))
        ));
    }

    #[test]
    fn test_stored_hash_roundtrip() {
        let hasher = PasswordHasher::new(TEST_COST).unwrap();
        let password = ClearTextPassword::new("Password1".to_string()).unwrap();
        let hashed = hasher.hash(&password).unwrap();

        let restored = HashedPassword::from_hash_string(hashed.as_str()).unwrap();
        assert!(hasher.verify(&password, &restored));
        assert!(HashedPassword::from_hash_string("not_a_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::for_verification("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
