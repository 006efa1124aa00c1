//! Infrastructure Layer
//!
//! Store implementations and external service integrations.

pub mod mailer;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod timeout;

pub use mailer::LogMailer;
pub use memory::{MemoryCredentialStore, MemoryTokenStore};
pub use postgres::PgCredentialStore;
pub use redis::RedisTokenStore;
pub use timeout::TimeoutStore;
