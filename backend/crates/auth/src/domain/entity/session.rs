//! Session Tokens
//!
//! The pair handed to a client after register, login or refresh.

use std::fmt;

/// Access token plus refresh token
#[derive(Clone)]
pub struct SessionTokens {
    /// Signed, self-contained access token
    pub access_token: String,
    /// Opaque refresh token, valid until used or revoked
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
