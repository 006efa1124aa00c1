//! User Password Value Object
//!
//! Domain value object for user passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(4).unwrap();
//! let raw = RawPassword::new("MySecurePass123".to_string()).unwrap();
//!
//! let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();
//! assert!(hashed.verify(&raw, &hasher));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a password for a new credential
    ///
    /// 8 to 128 characters with at least one uppercase letter, one
    /// lowercase letter and one digit.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            AppError::bad_request(e.to_string()).with_code("validation_error")
        })?;

        Ok(Self(clear_text))
    }

    /// Wrap a login candidate; no policy applies.
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// bcrypt hash of a user's password, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated password with a fresh salt
    pub fn from_raw(raw: &RawPassword, hasher: &PasswordHasher) -> AppResult<Self> {
        hasher
            .hash(raw.inner())
            .map(Self)
            .map_err(|e| AppError::internal(e.to_string()))
    }

    /// Restore from the stored hash string
    pub fn from_hash_string(hash: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_hash_string(hash)
            .map(Self)
            .map_err(|e| AppError::internal(e.to_string()))
    }

    pub fn verify(&self, raw: &RawPassword, hasher: &PasswordHasher) -> bool {
        hasher.verify(raw.inner(), &self.0)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}
