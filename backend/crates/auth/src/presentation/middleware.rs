//! Auth Middleware and Extractors
//!
//! - [`AuthenticatedUser`]: bearer access token → user id, or 401
//! - [`JsonBody`]: JSON body whose rejection is an `invalid_request` error
//! - [`rate_limit`]: per-client fixed window in front of every auth route

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::{extract_bearer_token, extract_client_ip};
use platform::rate_limit::{RateLimitStore, check as check_rate_limit};
use serde::de::DeserializeOwned;

use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

// ============================================================================
// Authenticated principal
// ============================================================================

/// Caller identified by a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl<C, T> FromRequestParts<AuthAppState<C, T>> for AuthenticatedUser
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthAppState<C, T>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        let user_id = state.services.codec.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AuthError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(Self { user_id })
    }
}

// ============================================================================
// JSON body
// ============================================================================

/// `Json<T>` whose rejection renders as `invalid_request`
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected request body");
            AuthError::InvalidRequest
        })?;

        Ok(Self(value))
    }
}

// ============================================================================
// Rate limiting
// ============================================================================

/// Count the request against its client; 429 once the window is spent
///
/// A failing counter store lets the request through.
pub async fn rate_limit<C, T>(
    State(state): State<AuthAppState<C, T>>,
    req: Request,
    next: Next,
) -> Response
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let key = match extract_client_ip(req.headers(), direct_ip) {
        Some(ip) => format!("rate_limit:{}", ip),
        None => "rate_limit:unknown".to_string(),
    };

    let config = &state.services.config.rate_limit;

    match check_rate_limit(state.tokens.as_ref(), &key, config).await {
        Ok(result) if !result.allowed => {
            tracing::warn!(client = %key, "Rate limit exceeded");
            return AuthError::RateLimited.into_response();
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit store unavailable; allowing request");
        }
    }

    next.run(req).await
}
