//! Mailer Implementations

use platform::crypto::token_fingerprint;

use crate::domain::service::mailer::{Mailer, OutgoingMail};
use crate::error::AuthResult;

/// Writes outgoing mail to the log instead of delivering it
///
/// The logged link points at the frontend page; the token itself is
/// represented by its fingerprint.
#[derive(Debug, Clone)]
pub struct LogMailer {
    frontend_url: String,
}

impl LogMailer {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into(),
        }
    }

    /// Frontend page that consumes the mail's token
    pub fn link_for(&self, mail: &OutgoingMail) -> String {
        let page = match mail {
            OutgoingMail::PasswordReset { .. } => "reset-password",
            OutgoingMail::EmailVerification { .. } => "verify-email",
        };
        format!("{}/{}", self.frontend_url.trim_end_matches('/'), page)
    }
}

impl Mailer for LogMailer {
    fn send(&self, mail: OutgoingMail) -> AuthResult<()> {
        tracing::info!(
            to = %mail.recipient(),
            template = mail.template(),
            link = %self.link_for(&mail),
            token = %token_fingerprint(mail.token()),
            "Mail queued"
        );
        Ok(())
    }
}

/// Keeps sent mail in memory so tests can read tokens back
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: std::sync::Mutex<Vec<OutgoingMail>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub(crate) fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Token of the most recent mail of the given template
    pub(crate) fn last_token(&self, template: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|mail| mail.template() == template)
            .map(|mail| mail.token().to_string())
    }
}

#[cfg(test)]
impl Mailer for RecordingMailer {
    fn send(&self, mail: OutgoingMail) -> AuthResult<()> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;

    #[test]
    fn test_links() {
        let mailer = LogMailer::new("http://localhost:5173/");
        let to = Email::new("a@example.com").unwrap();

        let reset = OutgoingMail::PasswordReset {
            to: to.clone(),
            token: "t".into(),
        };
        assert_eq!(mailer.link_for(&reset), "http://localhost:5173/reset-password");

        let verify = OutgoingMail::EmailVerification { to, token: "t".into() };
        assert_eq!(mailer.link_for(&verify), "http://localhost:5173/verify-email");
        assert!(mailer.send(verify).is_ok());
    }
}
