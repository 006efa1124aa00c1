//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by client. The counting itself lives in a
//! [`RateLimitStore`] so that several processes can share one window.

use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(1),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Turn the running count of the current window into a decision
    pub fn evaluate(&self, count: u64) -> RateLimitResult {
        let max = u64::from(self.max_requests);
        RateLimitResult {
            allowed: count <= max,
            remaining: max.saturating_sub(count) as u32,
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request against `key` and return the count so far in the
    /// current window. The first hit of a window starts it with `window`
    /// as its lifetime.
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, BoxError>;
}

/// Count a request and decide whether it may proceed
pub async fn check<S>(
    store: &S,
    key: &str,
    config: &RateLimitConfig,
) -> Result<RateLimitResult, BoxError>
where
    S: RateLimitStore + Sync,
{
    let count = store.hit(key, config.window).await?;
    Ok(config.evaluate(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_within_and_over_limit() {
        let config = RateLimitConfig::new(3, 1);

        assert_eq!(
            config.evaluate(1),
            RateLimitResult {
                allowed: true,
                remaining: 2
            }
        );
        assert!(config.evaluate(3).allowed);
        assert_eq!(config.evaluate(3).remaining, 0);

        let over = config.evaluate(4);
        assert!(!over.allowed);
        assert_eq!(over.remaining, 0);
    }

    #[test]
    fn test_default_is_ten_per_second() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window, Duration::from_secs(1));
    }
}
