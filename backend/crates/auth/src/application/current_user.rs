//! Current User Use Case
//!
//! Resolves the account behind an authenticated request.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct CurrentUserUseCase<C>
where
    C: CredentialStore,
{
    users: Arc<C>,
}

impl<C> CurrentUserUseCase<C>
where
    C: CredentialStore + Sync,
{
    pub fn new(users: Arc<C>) -> Self {
        Self { users }
    }

    /// A valid token whose user no longer exists is treated as unauthenticated
    pub async fn execute(&self, user_id: &UserId) -> AuthResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::Unauthorized("User no longer exists".to_string()))
    }
}
