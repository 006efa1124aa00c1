//! Token Lifecycle
//!
//! Issues, rotates, redeems and revokes every token the service hands out:
//! session pairs (access + refresh), password-reset tokens and
//! email-verification tokens.
//!
//! Opaque tokens live in the [`TokenStore`]:
//!
//! | key                     | value       | lifetime |
//! |-------------------------|-------------|----------|
//! | `refresh_token:{token}` | user id     | 7 days   |
//! | `password_reset:{token}`| email       | 1 hour   |
//! | `email_verify:{token}`  | email       | 7 days   |
//! | `user_sessions:{id}`    | set of live refresh tokens | 7 days |
//!
//! Raw token values never reach the logs; a short fingerprint stands in.

use std::sync::Arc;

use platform::crypto::token_fingerprint;

use crate::application::services::AuthServices;
use crate::domain::entity::{session::SessionTokens, user::User};
use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::service::mailer::OutgoingMail;
use crate::domain::value_object::{
    email::Email,
    token_kind::{TokenKind, new_opaque_token, session_index_key},
    user_id::UserId,
    user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

pub struct TokenLifecycle<C, T>
where
    C: CredentialStore,
    T: TokenStore,
{
    users: Arc<C>,
    tokens: Arc<T>,
    services: Arc<AuthServices>,
}

impl<C, T> TokenLifecycle<C, T>
where
    C: CredentialStore + Sync,
    T: TokenStore + Sync,
{
    pub fn new(users: Arc<C>, tokens: Arc<T>, services: Arc<AuthServices>) -> Self {
        Self {
            users,
            tokens,
            services,
        }
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Mint an access token and a fresh refresh token for `user`
    pub async fn issue_session(&self, user: &User) -> AuthResult<SessionTokens> {
        let config = &self.services.config;

        let access_token = self.services.codec.sign(&user.id, config.access_token_ttl)?;
        let refresh_token = new_opaque_token();

        self.tokens
            .set(
                &TokenKind::Refresh.key(&refresh_token),
                &user.id.to_string(),
                config.refresh_token_ttl,
            )
            .await?;
        self.prune_session_index(&user.id).await;
        self.tokens
            .add_member(
                &session_index_key(&user.id),
                &refresh_token,
                config.refresh_token_ttl,
            )
            .await?;

        tracing::debug!(
            user_id = %user.id,
            refresh = %token_fingerprint(&refresh_token),
            "Session issued"
        );

        Ok(SessionTokens {
            access_token,
            refresh_token,
            expires_in: config.access_token_ttl_secs(),
        })
    }

    /// Exchange a refresh token for a new session
    ///
    /// The old token is resolved first and invalidated by an atomic take,
    /// so a failed lookup leaves it usable and of two concurrent calls with
    /// the same token exactly one succeeds.
    pub async fn rotate_session(&self, refresh_token: &str) -> AuthResult<(User, SessionTokens)> {
        let invalid = || AuthError::InvalidToken(TokenKind::Refresh);
        let key = TokenKind::Refresh.key(refresh_token);

        let owner = self.tokens.get(&key).await?.ok_or_else(invalid)?;
        let user_id: UserId = owner.parse().map_err(|_| invalid())?;

        let Some(user) = self.users.find_by_id(&user_id).await? else {
            self.tokens.delete(&key).await?;
            return Err(invalid());
        };

        if self.tokens.take(&key).await?.is_none() {
            tracing::warn!(
                user_id = %user_id,
                refresh = %token_fingerprint(refresh_token),
                "Refresh token already used"
            );
            return Err(invalid());
        }
        self.forget_session(&user_id, refresh_token).await;

        let session = self.issue_session(&user).await?;

        tracing::info!(user_id = %user.id, "Session refreshed");

        Ok((user, session))
    }

    /// Revoke one refresh token; unknown tokens are a no-op
    pub async fn terminate_session(&self, refresh_token: &str) -> AuthResult<()> {
        let owner = self.tokens.take(&TokenKind::Refresh.key(refresh_token)).await?;

        if let Some(user_id) = owner.and_then(|owner| owner.parse::<UserId>().ok()) {
            self.forget_session(&user_id, refresh_token).await;
            tracing::info!(user_id = %user_id, "Session terminated");
        }

        Ok(())
    }

    /// Revoke every refresh token of a user; returns how many were live
    pub async fn terminate_all_sessions(&self, user_id: &UserId) -> AuthResult<usize> {
        let index = session_index_key(user_id);
        let mut revoked = 0;

        for refresh_token in self.tokens.members(&index).await? {
            if self
                .tokens
                .take(&TokenKind::Refresh.key(&refresh_token))
                .await?
                .is_some()
            {
                revoked += 1;
            }
        }
        self.tokens.delete(&index).await?;

        tracing::info!(user_id = %user_id, revoked, "All sessions terminated");

        Ok(revoked)
    }

    /// Drop index entries whose refresh token already expired
    async fn prune_session_index(&self, user_id: &UserId) {
        let members = match self.tokens.members(&session_index_key(user_id)).await {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "Failed to read session index");
                return;
            }
        };

        for refresh_token in members {
            match self.tokens.get(&TokenKind::Refresh.key(&refresh_token)).await {
                Ok(Some(_)) => {}
                Ok(None) => self.forget_session(user_id, &refresh_token).await,
                Err(e) => {
                    tracing::warn!(error = %e, user_id = %user_id, "Failed to prune session index");
                    return;
                }
            }
        }
    }

    async fn forget_session(&self, user_id: &UserId, refresh_token: &str) {
        if let Err(e) = self
            .tokens
            .remove_member(&session_index_key(user_id), refresh_token)
            .await
        {
            tracing::warn!(error = %e, user_id = %user_id, "Failed to update session index");
        }
    }

    // ========================================================================
    // Password reset
    // ========================================================================

    /// Start a password reset for `raw_email`
    ///
    /// Returns `None` without touching the store when the email is malformed
    /// or unknown. Callers must answer identically in every case.
    pub async fn issue_password_reset(&self, raw_email: &str) -> AuthResult<Option<String>> {
        let Ok(email) = Email::new(raw_email) else {
            return Ok(None);
        };

        if self.users.find_by_email(&email).await?.is_none() {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(None);
        }

        let token = new_opaque_token();
        self.tokens
            .set(
                &TokenKind::PasswordReset.key(&token),
                email.as_str(),
                self.services.config.password_reset_ttl,
            )
            .await?;

        tracing::info!(reset = %token_fingerprint(&token), "Password reset issued");

        self.services.dispatch(OutgoingMail::PasswordReset {
            to: email,
            token: token.clone(),
        });

        Ok(Some(token))
    }

    /// Set a new password using a reset token
    ///
    /// The token is deleted only after the password is stored, so a failed
    /// update leaves it redeemable.
    pub async fn redeem_password_reset(&self, token: &str, new_password: String) -> AuthResult<()> {
        let password = RawPassword::new(new_password)?;

        let key = TokenKind::PasswordReset.key(token);
        let email = self
            .tokens
            .get(&key)
            .await?
            .map(Email::from_db)
            .ok_or(AuthError::InvalidToken(TokenKind::PasswordReset))?;

        let password_hash = self.services.hash_password(password).await?;

        if !self.users.update_password(&email, &password_hash).await? {
            return Err(AuthError::InvalidToken(TokenKind::PasswordReset));
        }

        if let Err(e) = self.tokens.delete(&key).await {
            tracing::error!(
                error = %e,
                reset = %token_fingerprint(token),
                "Failed to delete used reset token"
            );
        }

        tracing::info!(reset = %token_fingerprint(token), "Password reset completed");

        Ok(())
    }

    // ========================================================================
    // Email verification
    // ========================================================================

    /// Store a verification token for `email` and mail it
    pub async fn issue_email_verification(&self, email: &Email) -> AuthResult<String> {
        let token = new_opaque_token();
        self.tokens
            .set(
                &TokenKind::EmailVerification.key(&token),
                email.as_str(),
                self.services.config.email_verification_ttl,
            )
            .await?;

        self.services.dispatch(OutgoingMail::EmailVerification {
            to: email.clone(),
            token: token.clone(),
        });

        Ok(token)
    }

    /// Mark the owner of a verification token as verified
    ///
    /// Succeeds once per token: the flag is set first (idempotent), then the
    /// atomic take decides which caller consumed the token.
    pub async fn redeem_email_verification(&self, token: &str) -> AuthResult<()> {
        let invalid = || AuthError::InvalidToken(TokenKind::EmailVerification);
        let key = TokenKind::EmailVerification.key(token);

        let email = self.tokens.get(&key).await?.map(Email::from_db).ok_or_else(invalid)?;

        if !self.users.mark_email_verified(&email).await? {
            self.tokens.delete(&key).await?;
            return Err(invalid());
        }

        if self.tokens.take(&key).await?.is_none() {
            return Err(invalid());
        }

        tracing::info!(verify = %token_fingerprint(token), "Email verified");

        Ok(())
    }

    /// Re-send verification to an existing, unverified account
    ///
    /// Returns the new token, or `None` when nothing was sent.
    pub async fn resend_email_verification(&self, raw_email: &str) -> AuthResult<Option<String>> {
        let Ok(email) = Email::new(raw_email) else {
            return Ok(None);
        };

        match self.users.find_by_email(&email).await? {
            Some(user) if !user.email_verified => {
                self.issue_email_verification(&user.email).await.map(Some)
            }
            _ => Ok(None),
        }
    }
}
