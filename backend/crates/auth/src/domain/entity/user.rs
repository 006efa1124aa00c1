//! User Entity
//!
//! A registered account: identity, credentials and verification state.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_id::UserId, user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, also the access token subject
    pub id: UserId,
    /// Normalized email (unique)
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: UserPassword,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: UserPassword,
}

impl User {
    /// Build a fresh, unverified user
    pub fn register(new_user: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn mark_email_verified(&mut self) {
        self.email_verified = true;
        self.updated_at = Utc::now();
    }
}
