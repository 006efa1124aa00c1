//! Opaque Token Kinds
//!
//! Refresh, password-reset and email-verification tokens are random
//! strings that only mean something while the ephemeral store holds them.
//! Each kind lives under its own key prefix.

use derive_more::Display;
use platform::crypto::random_token;

use crate::domain::value_object::user_id::UserId;

/// Random bytes per opaque token (43 base64url characters)
pub const TOKEN_BYTES: usize = 32;

const SESSION_INDEX_PREFIX: &str = "user_sessions:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    #[display("refresh token")]
    Refresh,
    #[display("reset token")]
    PasswordReset,
    #[display("verification token")]
    EmailVerification,
}

impl TokenKind {
    pub const fn prefix(&self) -> &'static str {
        match self {
            TokenKind::Refresh => "refresh_token:",
            TokenKind::PasswordReset => "password_reset:",
            TokenKind::EmailVerification => "email_verify:",
        }
    }

    /// Store key holding this token
    pub fn key(&self, token: &str) -> String {
        format!("{}{}", self.prefix(), token)
    }
}

/// Fresh opaque token value
pub fn new_opaque_token() -> String {
    random_token(TOKEN_BYTES)
}

/// Store key of the set listing a user's live refresh tokens
pub fn session_index_key(user_id: &UserId) -> String {
    format!("{}{}", SESSION_INDEX_PREFIX, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(TokenKind::Refresh.key("abc"), "refresh_token:abc");
        assert_eq!(TokenKind::PasswordReset.key("abc"), "password_reset:abc");
        assert_eq!(TokenKind::EmailVerification.key("abc"), "email_verify:abc");

        let user_id = UserId::new();
        assert_eq!(
            session_index_key(&user_id),
            format!("user_sessions:{}", user_id)
        );
    }

    #[test]
    fn test_opaque_tokens_are_unique() {
        let a = new_opaque_token();
        let b = new_opaque_token();
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::PasswordReset.to_string(), "reset token");
    }
}
