//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, SHA-256, Base64url)
//! - Password policy and bcrypt hashing
//! - Rate limiting abstractions
//! - Client identification (IP, bearer credentials)

pub mod client;
pub mod crypto;
pub mod password;
pub mod rate_limit;
