//! Health Check Use Case
//!
//! Probes both stores, each bounded by the configured timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::repository::{CredentialStore, TokenStore};
use crate::error::AuthResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub database: bool,
    pub ephemeral_store: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.database && self.ephemeral_store
    }
}

pub struct HealthCheckUseCase<C, T>
where
    C: CredentialStore,
    T: TokenStore,
{
    users: Arc<C>,
    tokens: Arc<T>,
    timeout: Duration,
}

impl<C, T> HealthCheckUseCase<C, T>
where
    C: CredentialStore + Sync,
    T: TokenStore + Sync,
{
    pub fn new(users: Arc<C>, tokens: Arc<T>, timeout: Duration) -> Self {
        Self {
            users,
            tokens,
            timeout,
        }
    }

    pub async fn execute(&self) -> HealthReport {
        let (database, ephemeral_store) = tokio::join!(
            probe("database", self.timeout, self.users.ping()),
            probe("ephemeral_store", self.timeout, self.tokens.ping()),
        );

        HealthReport {
            database,
            ephemeral_store,
        }
    }
}

async fn probe(
    name: &'static str,
    timeout: Duration,
    ping: impl Future<Output = AuthResult<()>>,
) -> bool {
    match tokio::time::timeout(timeout, ping).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(check = name, error = %e, "Health probe failed");
            false
        }
        Err(_) => {
            tracing::warn!(check = name, ?timeout, "Health probe timed out");
            false
        }
    }
}
