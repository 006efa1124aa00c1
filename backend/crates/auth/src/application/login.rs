//! Login Use Case
//!
//! Authenticates email + password and opens a session.
//!
//! Every failure looks the same to the caller: unknown email, malformed
//! email and wrong password all end in `InvalidCredentials` after one
//! bcrypt comparison.

use std::sync::Arc;

use crate::application::services::AuthServices;
use crate::application::token_lifecycle::TokenLifecycle;
use crate::domain::entity::{session::SessionTokens, user::User};
use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub session: SessionTokens,
}

/// Login use case
pub struct LoginUseCase<C, T>
where
    C: CredentialStore,
    T: TokenStore,
{
    users: Arc<C>,
    tokens: Arc<T>,
    services: Arc<AuthServices>,
}

impl<C, T> LoginUseCase<C, T>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let candidate = RawPassword::candidate(input.password);

        let user = match Email::new(&input.email) {
            Ok(email) => self.users.find_by_email(&email).await?,
            Err(_) => None,
        };

        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let matched = self.services.verify_password(candidate, stored).await?;

        let user = match user {
            Some(user) if matched => user,
            Some(user) => {
                tracing::warn!(user_id = %user.id, "Login with wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                tracing::warn!("Login for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let session = TokenLifecycle::new(
            self.users.clone(),
            self.tokens.clone(),
            self.services.clone(),
        )
        .issue_session(&user)
        .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput { user, session })
    }
}
