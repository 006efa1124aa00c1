//! In-Memory Store Implementations
//!
//! `DashMap`-backed stores for tests and single-process development.
//! Expiry follows `tokio::time`, so a paused test clock drives it.

use std::collections::HashSet;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use platform::rate_limit::{BoxError, RateLimitStore};
use tokio::time::Instant;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Credential Store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn id_for(&self, email: &Email) -> Option<UserId> {
        self.emails.get(email.as_str()).map(|entry| *entry.value())
    }

    fn modify(&self, email: &Email, f: impl FnOnce(&mut User)) -> bool {
        let Some(user_id) = self.id_for(email) else {
            return false;
        };

        match self.users.get_mut(&user_id) {
            Some(mut user) => {
                f(&mut user);
                true
            }
            None => false,
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn create_user(&self, new_user: NewUser) -> AuthResult<User> {
        match self.emails.entry(new_user.email.as_str().to_string()) {
            Entry::Occupied(_) => Err(AuthError::EmailTaken),
            Entry::Vacant(slot) => {
                let user = User::register(new_user);
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .id_for(email)
            .and_then(|user_id| self.users.get(&user_id).map(|user| user.clone())))
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.get(user_id).map(|user| user.clone()))
    }

    async fn update_password(&self, email: &Email, password_hash: &UserPassword) -> AuthResult<bool> {
        Ok(self.modify(email, |user| user.set_password(password_hash.clone())))
    }

    async fn mark_email_verified(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.modify(email, User::mark_email_verified))
    }

    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}

// ============================================================================
// Token Store
// ============================================================================

#[derive(Debug, Clone)]
struct Expiring<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Expiring<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: DashMap<String, Expiring<String>>,
    sets: DashMap<String, Expiring<HashSet<String>>>,
    windows: DashMap<String, Expiring<u64>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry
    pub fn purge_expired(&self) {
        self.values.retain(|_, entry| entry.is_live());
        self.sets.retain(|_, entry| entry.is_live());
        self.windows.retain(|_, entry| entry.is_live());
    }
}

impl TokenStore for MemoryTokenStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()> {
        self.values
            .insert(key.to_string(), Expiring::new(value.to_string(), ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self
            .values
            .get(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone()))
    }

    async fn take(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self
            .values
            .remove(key)
            .map(|(_, entry)| entry)
            .filter(Expiring::is_live)
            .map(|entry| entry.value))
    }

    async fn delete(&self, key: &str) -> AuthResult<()> {
        self.values.remove(key);
        self.sets.remove(key);
        Ok(())
    }

    async fn add_member(&self, set_key: &str, member: &str, ttl: Duration) -> AuthResult<()> {
        let mut entry = self
            .sets
            .entry(set_key.to_string())
            .or_insert_with(|| Expiring::new(HashSet::new(), ttl));

        if !entry.is_live() {
            entry.value.clear();
        }
        entry.value.insert(member.to_string());
        entry.expires_at = Instant::now() + ttl;

        Ok(())
    }

    async fn remove_member(&self, set_key: &str, member: &str) -> AuthResult<()> {
        if let Some(mut entry) = self.sets.get_mut(set_key) {
            entry.value.remove(member);
        }
        Ok(())
    }

    async fn members(&self, set_key: &str) -> AuthResult<Vec<String>> {
        Ok(self
            .sets
            .get(set_key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}

impl RateLimitStore for MemoryTokenStore {
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, BoxError> {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Expiring::new(0, window));

        if !entry.is_live() {
            *entry = Expiring::new(0, window);
        }
        entry.value += 1;

        Ok(entry.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::display_name::DisplayName;
    use crate::domain::value_object::user_password::RawPassword;
    use platform::password::PasswordHasher;

    fn new_user(email: &str) -> NewUser {
        let hasher = PasswordHasher::new(4).unwrap();
        let raw = RawPassword::new("Password123".to_string()).unwrap();
        NewUser {
            email: Email::new(email).unwrap(),
            name: DisplayName::new("Test User").unwrap(),
            password_hash: UserPassword::from_raw(&raw, &hasher).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = MemoryCredentialStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        assert!(!user.email_verified);

        let email = Email::new("A@Example.com").unwrap();
        let found = store.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let found = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(found.email, email);
        assert!(store.find_by_id(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryCredentialStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_updates_report_missing_user() {
        let store = MemoryCredentialStore::new();
        let email = Email::new("ghost@example.com").unwrap();
        let hash = new_user("ghost@example.com").password_hash;

        assert!(!store.update_password(&email, &hash).await.unwrap());
        assert!(!store.mark_email_verified(&email).await.unwrap());

        store.create_user(new_user("ghost@example.com")).await.unwrap();
        assert!(store.mark_email_verified(&email).await.unwrap());
        let user = store.find_by_email(&email).await.unwrap().unwrap();
        assert!(user.email_verified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_values_expire() {
        let store = MemoryTokenStore::new();
        store.set("k", "v", Duration::from_secs(10)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.take("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_take_is_single_use() {
        let store = MemoryTokenStore::new();
        store.set("k", "v", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.take("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.take("k").await.unwrap(), None);
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sets() {
        let store = MemoryTokenStore::new();
        let ttl = Duration::from_secs(60);
        store.add_member("s", "a", ttl).await.unwrap();
        store.add_member("s", "b", ttl).await.unwrap();
        store.remove_member("s", "a").await.unwrap();

        assert_eq!(store.members("s").await.unwrap(), vec!["b".to_string()]);

        store.delete("s").await.unwrap();
        assert!(store.members("s").await.unwrap().is_empty());
        store.delete("missing").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_window_resets() {
        let store = MemoryTokenStore::new();
        let window = Duration::from_secs(1);

        assert_eq!(store.hit("ip", window).await.unwrap(), 1);
        assert_eq!(store.hit("ip", window).await.unwrap(), 2);
        assert_eq!(store.hit("other", window).await.unwrap(), 1);

        tokio::time::advance(window).await;
        assert_eq!(store.hit("ip", window).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let store = MemoryTokenStore::new();
        store.set("short", "v", Duration::from_secs(1)).await.unwrap();
        store.set("long", "v", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        store.purge_expired();

        assert!(!store.values.contains_key("short"));
        assert!(store.values.contains_key("long"));
    }
}
