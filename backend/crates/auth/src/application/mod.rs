//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod health;
pub mod login;
pub mod register;
pub mod services;
pub mod token_lifecycle;

// Re-exports
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use health::{HealthCheckUseCase, HealthReport};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use services::AuthServices;
pub use token_lifecycle::TokenLifecycle;
