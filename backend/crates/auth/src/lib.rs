//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, token codec, store traits
//! - `application/` - Use cases and the token lifecycle
//! - `infra/` - PostgreSQL, Redis and in-memory stores, mailers
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password registration and login
//! - Short-lived HS256 access tokens, rotating opaque refresh tokens
//! - Logout of one session or of every session
//! - Password reset and email verification through single-use tokens
//! - Per-client rate limiting
//!
//! ## Security Model
//! - Passwords hashed with bcrypt (cost 10-14, default 12)
//! - Unknown accounts cost one dummy bcrypt comparison
//! - Refresh, reset and verification tokens are 256-bit random values,
//!   single-use, kept only in the ephemeral store
//! - Tokens never appear in logs; a SHA-256 fingerprint stands in

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{AuthServices, config::AuthConfig};
pub use error::{AuthError, AuthResult};
pub use infra::{
    LogMailer, MemoryCredentialStore, MemoryTokenStore, PgCredentialStore, RedisTokenStore,
    TimeoutStore,
};
pub use presentation::{AuthAppState, auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
