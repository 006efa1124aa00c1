//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::rate_limit::RateLimitStore;

use crate::domain::repository::{CredentialStore, TokenStore};
use crate::infra::{PgCredentialStore, RedisTokenStore, TimeoutStore};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::rate_limit;

/// Path prefix of every auth route
pub const AUTH_PREFIX: &str = "/api/v1/auth";

/// Create the Auth router with time-bounded PostgreSQL and Redis stores
pub fn auth_router(
    state: AuthAppState<TimeoutStore<PgCredentialStore>, TimeoutStore<RedisTokenStore>>,
) -> Router {
    auth_router_generic(state)
}

/// Create a generic Auth router for any store implementation
///
/// Auth routes are nested under [`AUTH_PREFIX`] behind the rate limiter;
/// `/health` stays at the root and is not limited.
pub fn auth_router_generic<C, T>(state: AuthAppState<C, T>) -> Router
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let auth_routes = Router::new()
        .route("/register", post(handlers::register::<C, T>))
        .route("/login", post(handlers::login::<C, T>))
        .route("/refresh", post(handlers::refresh::<C, T>))
        .route("/logout", post(handlers::logout::<C, T>))
        .route("/logout-all", post(handlers::logout_all::<C, T>))
        .route("/forgot-password", post(handlers::forgot_password::<C, T>))
        .route("/reset-password", post(handlers::reset_password::<C, T>))
        .route("/verify-email", post(handlers::verify_email::<C, T>))
        .route(
            "/resend-verification",
            post(handlers::resend_verification::<C, T>),
        )
        .route("/me", get(handlers::me::<C, T>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::<C, T>,
        ));

    Router::new()
        .nest(AUTH_PREFIX, auth_routes)
        .route("/health", get(handlers::health::<C, T>))
        .with_state(state)
}
