//! Repository Traits
//!
//! Interfaces for persistence. Implementations are in the infrastructure layer.

use std::time::Duration;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::AuthResult;

/// Durable user records
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Insert a user; `AuthError::EmailTaken` when the email already exists
    async fn create_user(&self, new_user: NewUser) -> AuthResult<User>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Replace the password hash; `false` when no such user exists
    async fn update_password(&self, email: &Email, password_hash: &UserPassword)
    -> AuthResult<bool>;

    /// Set the verified flag; `false` when no such user exists
    async fn mark_email_verified(&self, email: &Email) -> AuthResult<bool>;

    async fn ping(&self) -> AuthResult<()>;
}

/// Short-lived key/value entries with per-key expiry
///
/// Expired entries must be indistinguishable from absent ones.
#[trait_variant::make(TokenStore: Send)]
pub trait LocalTokenStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()>;

    async fn get(&self, key: &str) -> AuthResult<Option<String>>;

    /// Read and delete in one atomic step. Of several concurrent callers at
    /// most one receives the value.
    async fn take(&self, key: &str) -> AuthResult<Option<String>>;

    /// Remove a key of any type; absent keys are fine
    async fn delete(&self, key: &str) -> AuthResult<()>;

    /// Add to a set and (re)arm the set's expiry
    async fn add_member(&self, set_key: &str, member: &str, ttl: Duration) -> AuthResult<()>;

    async fn remove_member(&self, set_key: &str, member: &str) -> AuthResult<()>;

    async fn members(&self, set_key: &str) -> AuthResult<Vec<String>>;

    async fn ping(&self) -> AuthResult<()>;
}
