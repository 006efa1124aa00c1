//! Store Timeouts
//!
//! [`TimeoutStore`] bounds every call of the store it wraps. A call that
//! does not answer within the limit fails with `AuthError::Store`, so a
//! wedged connection turns into a 500 instead of a hung request.

use std::future::Future;
use std::time::Duration;

use platform::rate_limit::{BoxError, RateLimitStore};

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// Wraps a store and applies one time limit to each call
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<V>(
        &self,
        op: &'static str,
        call: impl Future<Output = AuthResult<V>>,
    ) -> AuthResult<V> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(op, limit = ?self.limit, "Store call timed out");
                Err(AuthError::Store(format!(
                    "{} timed out after {:?}",
                    op, self.limit
                )))
            }
        }
    }
}

impl<S> CredentialStore for TimeoutStore<S>
where
    S: CredentialStore + Sync,
{
    async fn create_user(&self, new_user: NewUser) -> AuthResult<User> {
        self.bounded("create_user", self.inner.create_user(new_user))
            .await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.bounded("find_by_email", self.inner.find_by_email(email))
            .await
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        self.bounded("find_by_id", self.inner.find_by_id(user_id))
            .await
    }

    async fn update_password(&self, email: &Email, password_hash: &UserPassword) -> AuthResult<bool> {
        self.bounded(
            "update_password",
            self.inner.update_password(email, password_hash),
        )
        .await
    }

    async fn mark_email_verified(&self, email: &Email) -> AuthResult<bool> {
        self.bounded("mark_email_verified", self.inner.mark_email_verified(email))
            .await
    }

    async fn ping(&self) -> AuthResult<()> {
        self.bounded("ping", CredentialStore::ping(&self.inner)).await
    }
}

impl<S> TokenStore for TimeoutStore<S>
where
    S: TokenStore + Sync,
{
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn take(&self, key: &str) -> AuthResult<Option<String>> {
        self.bounded("take", self.inner.take(key)).await
    }

    async fn delete(&self, key: &str) -> AuthResult<()> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn add_member(&self, set_key: &str, member: &str, ttl: Duration) -> AuthResult<()> {
        self.bounded("add_member", self.inner.add_member(set_key, member, ttl))
            .await
    }

    async fn remove_member(&self, set_key: &str, member: &str) -> AuthResult<()> {
        self.bounded("remove_member", self.inner.remove_member(set_key, member))
            .await
    }

    async fn members(&self, set_key: &str) -> AuthResult<Vec<String>> {
        self.bounded("members", self.inner.members(set_key)).await
    }

    async fn ping(&self) -> AuthResult<()> {
        self.bounded("ping", TokenStore::ping(&self.inner)).await
    }
}

impl<S> RateLimitStore for TimeoutStore<S>
where
    S: RateLimitStore + Sync,
{
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, BoxError> {
        match tokio::time::timeout(self.limit, self.inner.hit(key, window)).await {
            Ok(result) => result,
            Err(elapsed) => Err(elapsed.into()),
        }
    }
}

/// A store that never answers
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct HungStore;

#[cfg(test)]
impl CredentialStore for HungStore {
    async fn create_user(&self, _new_user: NewUser) -> AuthResult<User> {
        std::future::pending().await
    }

    async fn find_by_email(&self, _email: &Email) -> AuthResult<Option<User>> {
        std::future::pending().await
    }

    async fn find_by_id(&self, _user_id: &UserId) -> AuthResult<Option<User>> {
        std::future::pending().await
    }

    async fn update_password(&self, _email: &Email, _hash: &UserPassword) -> AuthResult<bool> {
        std::future::pending().await
    }

    async fn mark_email_verified(&self, _email: &Email) -> AuthResult<bool> {
        std::future::pending().await
    }

    async fn ping(&self) -> AuthResult<()> {
        std::future::pending().await
    }
}

#[cfg(test)]
impl TokenStore for HungStore {
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AuthResult<()> {
        std::future::pending().await
    }

    async fn get(&self, _key: &str) -> AuthResult<Option<String>> {
        std::future::pending().await
    }

    async fn take(&self, _key: &str) -> AuthResult<Option<String>> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> AuthResult<()> {
        std::future::pending().await
    }

    async fn add_member(&self, _set_key: &str, _member: &str, _ttl: Duration) -> AuthResult<()> {
        std::future::pending().await
    }

    async fn remove_member(&self, _set_key: &str, _member: &str) -> AuthResult<()> {
        std::future::pending().await
    }

    async fn members(&self, _set_key: &str) -> AuthResult<Vec<String>> {
        std::future::pending().await
    }

    async fn ping(&self) -> AuthResult<()> {
        std::future::pending().await
    }
}

#[cfg(test)]
impl RateLimitStore for HungStore {
    async fn hit(&self, _key: &str, _window: Duration) -> Result<u64, BoxError> {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryTokenStore;

    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test(start_paused = true)]
    async fn test_hung_token_store_fails_at_limit() {
        let store = TimeoutStore::new(HungStore, LIMIT);
        let started = tokio::time::Instant::now();

        let err = store.get("refresh_token:abc").await.unwrap_err();

        assert!(matches!(err, AuthError::Store(_)));
        assert!(started.elapsed() >= LIMIT);
        assert!(started.elapsed() < LIMIT * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_credential_store_fails() {
        let store = TimeoutStore::new(HungStore, LIMIT);
        let email = Email::new("a@example.com").unwrap();

        assert!(matches!(
            store.find_by_email(&email).await,
            Err(AuthError::Store(_))
        ));
        assert!(matches!(
            CredentialStore::ping(&store).await,
            Err(AuthError::Store(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_rate_limit_store_fails() {
        let store = TimeoutStore::new(HungStore, LIMIT);
        assert!(store.hit("rate_limit:unknown", LIMIT).await.is_err());
    }

    #[tokio::test]
    async fn test_answers_pass_through() {
        let store = TimeoutStore::new(MemoryTokenStore::new(), LIMIT);

        store.set("k", "v", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.take("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
