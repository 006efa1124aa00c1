//! Shared Services
//!
//! Process-wide collaborators built once at startup and shared by every
//! use case: configuration, token codec, password hasher and mailer.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::domain::service::access_token::AccessTokenCodec;
use crate::domain::service::mailer::{Mailer, OutgoingMail};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct AuthServices {
    pub config: AuthConfig,
    pub codec: AccessTokenCodec,
    pub hasher: PasswordHasher,
    pub mailer: Arc<dyn Mailer>,
}

impl AuthServices {
    /// Fails when the configured bcrypt cost is unusable
    pub fn new(config: AuthConfig, mailer: Arc<dyn Mailer>) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let codec = AccessTokenCodec::new(config.access_token_secret.clone());

        Ok(Self {
            config,
            codec,
            hasher,
            mailer,
        })
    }

    /// Hash on the blocking pool; bcrypt would stall the runtime otherwise
    pub async fn hash_password(&self, password: RawPassword) -> AuthResult<UserPassword> {
        let hasher = self.hasher.clone();
        let hashed = tokio::task::spawn_blocking(move || UserPassword::from_raw(&password, &hasher))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))??;
        Ok(hashed)
    }

    /// Compare a login candidate against a stored hash
    ///
    /// Without a stored hash the dummy hash is checked instead, so an
    /// unknown account costs the same as a wrong password.
    pub async fn verify_password(
        &self,
        candidate: RawPassword,
        stored: Option<UserPassword>,
    ) -> AuthResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || match stored {
            Some(stored) => stored.verify(&candidate, &hasher),
            None => {
                hasher.verify_dummy(candidate.inner());
                false
            }
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Hand mail to the mailer; failures are logged, never surfaced
    pub fn dispatch(&self, mail: OutgoingMail) {
        let template = mail.template();
        if let Err(e) = self.mailer.send(mail) {
            tracing::error!(error = %e, template, "Failed to send mail");
        }
    }
}

impl std::fmt::Debug for AuthServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServices")
            .field("config", &self.config)
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}
