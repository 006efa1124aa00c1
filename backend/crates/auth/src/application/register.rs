//! Register Use Case
//!
//! Creates a new account and signs it in.

use std::sync::Arc;

use crate::application::services::AuthServices;
use crate::application::token_lifecycle::TokenLifecycle;
use crate::domain::entity::{
    session::SessionTokens,
    user::{NewUser, User},
};
use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::RawPassword,
};
use crate::error::AuthResult;

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub session: SessionTokens,
}

/// Register use case
pub struct RegisterUseCase<C, T>
where
    C: CredentialStore,
    T: TokenStore,
{
    users: Arc<C>,
    tokens: Arc<T>,
    services: Arc<AuthServices>,
}

impl<C, T> RegisterUseCase<C, T>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(&input.email)?;
        let password = RawPassword::new(input.password)?;
        let name = DisplayName::new(&input.name)?;

        let password_hash = self.services.hash_password(password).await?;

        // Uniqueness is left to the store so concurrent registrations race safely
        let user = self
            .users
            .create_user(NewUser {
                email,
                name,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let lifecycle = TokenLifecycle::new(
            self.users.clone(),
            self.tokens.clone(),
            self.services.clone(),
        );

        // The account exists either way; the user can ask for another mail
        if let Err(e) = lifecycle.issue_email_verification(&user.email).await {
            tracing::warn!(error = %e, user_id = %user.id, "Failed to issue verification token");
        }

        let session = lifecycle.issue_session(&user).await?;

        Ok(RegisterOutput { user, session })
    }
}
