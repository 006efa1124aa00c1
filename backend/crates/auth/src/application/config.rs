//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::crypto::random_bytes;
use platform::password::DEFAULT_COST;
use platform::rate_limit::RateLimitConfig;

/// Signing secret used by [`AuthConfig::development`]
pub const DEVELOPMENT_SECRET: &str = "development-secret-change-in-production";

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens, shared with every validating service
    pub access_token_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (7 days)
    pub refresh_token_ttl: Duration,
    /// Password reset token lifetime (1 hour)
    pub password_reset_ttl: Duration,
    /// Email verification token lifetime (7 days)
    pub email_verification_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Per-client request budget
    pub rate_limit: RateLimitConfig,
    /// Upper bound for a single store call
    pub store_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            password_reset_ttl: Duration::from_secs(3600), // 1 hour
            email_verification_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            bcrypt_cost: DEFAULT_COST,
            rate_limit: RateLimitConfig::default(),
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Create config signing with the given secret
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            access_token_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create config with a random secret; tokens die with the process
    pub fn with_random_secret() -> Self {
        Self::with_secret(random_bytes(32))
    }

    /// Create config for development (well-known secret)
    pub fn development() -> Self {
        Self::with_secret(DEVELOPMENT_SECRET)
    }

    /// Access token lifetime in seconds, as reported to clients
    pub fn access_token_ttl_secs(&self) -> u64 {
        self.access_token_ttl.as_secs()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("password_reset_ttl", &self.password_reset_ttl)
            .field("email_verification_ttl", &self.email_verification_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("rate_limit", &self.rate_limit)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::development();
        assert_eq!(config.access_token_ttl_secs(), 900);
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.password_reset_ttl, Duration::from_secs(3600));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.access_token_secret, DEVELOPMENT_SECRET.as_bytes());
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.access_token_secret.len(), 32);
        assert_ne!(a.access_token_secret, b.access_token_secret);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = AuthConfig::with_secret("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
