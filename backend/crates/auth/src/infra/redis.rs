//! Redis Token Store
//!
//! Ephemeral tokens on a pooled multiplexed connection. Expiry is native
//! (`PX`), and the atomic take is `GETDEL` (Redis 6.2+).

use std::time::Duration;

use bb8_redis::{RedisConnectionManager, bb8, redis};
use platform::rate_limit::{BoxError, RateLimitStore};

use crate::domain::repository::TokenStore;
use crate::error::{AuthError, AuthResult};

type RedisPool = bb8::Pool<RedisConnectionManager>;
type PooledConnection<'a> = bb8::PooledConnection<'a, RedisConnectionManager>;

const POOL_SIZE: u32 = 16;

/// Redis-backed token store
#[derive(Clone)]
pub struct RedisTokenStore {
    pool: RedisPool,
}

impl RedisTokenStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Build a pool for `url` (`redis://host:port/db`)
    pub async fn connect(url: &str, connection_timeout: Duration) -> AuthResult<Self> {
        let manager = RedisConnectionManager::new(url).map_err(store_error)?;
        let pool = bb8::Pool::builder()
            .max_size(POOL_SIZE)
            .connection_timeout(connection_timeout)
            .build(manager)
            .await
            .map_err(store_error)?;

        Ok(Self::new(pool))
    }

    async fn connection(&self) -> AuthResult<PooledConnection<'_>> {
        self.pool.get().await.map_err(store_error)
    }
}

fn store_error(e: impl std::fmt::Display) -> AuthError {
    AuthError::Store(e.to_string())
}

/// `PX` rejects zero, so sub-millisecond lifetimes round up
fn millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

impl TokenStore for RedisTokenStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(millis(ttl))
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        let mut conn = self.connection().await?;
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)
    }

    async fn take(&self, key: &str) -> AuthResult<Option<String>> {
        let mut conn = self.connection().await?;
        redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)
    }

    async fn delete(&self, key: &str) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let _removed: u64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn add_member(&self, set_key: &str, member: &str, ttl: Duration) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let () = redis::pipe()
            .atomic()
            .cmd("SADD")
            .arg(set_key)
            .arg(member)
            .ignore()
            .cmd("PEXPIRE")
            .arg(set_key)
            .arg(millis(ttl))
            .ignore()
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn remove_member(&self, set_key: &str, member: &str) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let _removed: u64 = redis::cmd("SREM")
            .arg(set_key)
            .arg(member)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn members(&self, set_key: &str) -> AuthResult<Vec<String>> {
        let mut conn = self.connection().await?;
        redis::cmd("SMEMBERS")
            .arg(set_key)
            .query_async(&mut *conn)
            .await
            .map_err(store_error)
    }

    async fn ping(&self) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let _pong: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

impl RateLimitStore for RedisTokenStore {
    /// Fixed window: the key is created with the window as its lifetime,
    /// then incremented, in one transaction.
    async fn hit(&self, key: &str, window: Duration) -> Result<u64, BoxError> {
        let mut conn = self.pool.get().await?;
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(key)
            .arg(0)
            .arg("NX")
            .arg("PX")
            .arg(millis(window))
            .ignore()
            .cmd("INCR")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_never_zero() {
        assert_eq!(millis(Duration::ZERO), 1);
        assert_eq!(millis(Duration::from_micros(10)), 1);
        assert_eq!(millis(Duration::from_secs(3600)), 3_600_000);
    }
}
