//! Outgoing mail port
//!
//! Reset and verification tokens reach the user only through a [`Mailer`].

use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMail {
    PasswordReset { to: Email, token: String },
    EmailVerification { to: Email, token: String },
}

impl OutgoingMail {
    pub fn recipient(&self) -> &Email {
        match self {
            OutgoingMail::PasswordReset { to, .. } | OutgoingMail::EmailVerification { to, .. } => to,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            OutgoingMail::PasswordReset { token, .. }
            | OutgoingMail::EmailVerification { token, .. } => token,
        }
    }

    /// Template name, also the tracing label
    pub fn template(&self) -> &'static str {
        match self {
            OutgoingMail::PasswordReset { .. } => "password_reset",
            OutgoingMail::EmailVerification { .. } => "email_verification",
        }
    }
}

/// Hands a message to the delivery channel without waiting for delivery
pub trait Mailer: Send + Sync {
    fn send(&self, mail: OutgoingMail) -> AuthResult<()>;
}
