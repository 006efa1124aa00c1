//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use platform::rate_limit::RateLimitStore;

use crate::application::{
    AuthServices, CurrentUserUseCase, HealthCheckUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase, TokenLifecycle,
};
use crate::domain::repository::{CredentialStore, TokenStore};
use crate::domain::value_object::token_kind::TokenKind;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthResponse, EmailRequest, HealthResponse, LoginRequest, LogoutRequest, MessageResponse,
    RefreshRequest, RegisterRequest, ResetPasswordRequest, UserResponse, VerifyEmailRequest,
};
use crate::presentation::middleware::{AuthenticatedUser, JsonBody};

/// Shared state for auth handlers
pub struct AuthAppState<C, T>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    pub users: Arc<C>,
    pub tokens: Arc<T>,
    pub services: Arc<AuthServices>,
}

impl<C, T> AuthAppState<C, T>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    pub fn new(users: C, tokens: T, services: AuthServices) -> Self {
        Self {
            users: Arc::new(users),
            tokens: Arc::new(tokens),
            services: Arc::new(services),
        }
    }

    fn lifecycle(&self) -> TokenLifecycle<C, T> {
        TokenLifecycle::new(self.users.clone(), self.tokens.clone(), self.services.clone())
    }
}

// Stores need not be Clone; only the Arcs are cloned.
impl<C, T> Clone for AuthAppState<C, T>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            tokens: self.tokens.clone(),
            services: self.services.clone(),
        }
    }
}

const RESET_SENT: &str = "If the email exists, a password reset link has been sent";
const VERIFICATION_SENT: &str = "If the account exists and is unverified, a verification email has been sent";

// ============================================================================
// Register / Login
// ============================================================================

/// POST /api/v1/auth/register
pub async fn register<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.users.clone(),
        state.tokens.clone(),
        state.services.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(&output.user, output.session)),
    ))
}

/// POST /api/v1/auth/login
pub async fn login<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.users.clone(),
        state.tokens.clone(),
        state.services.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(AuthResponse::new(&output.user, output.session)))
}

// ============================================================================
// Sessions
// ============================================================================

/// POST /api/v1/auth/refresh
pub async fn refresh<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<RefreshRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    if req.refresh_token.trim().is_empty() {
        return Err(AuthError::Validation("Refresh token is required".to_string()));
    }

    let (user, session) = state.lifecycle().rotate_session(&req.refresh_token).await?;

    Ok(Json(AuthResponse::new(&user, session)))
}

/// POST /api/v1/auth/logout
///
/// Always 204: a missing, unknown or unreadable token changes nothing.
pub async fn logout<C, T>(State(state): State<AuthAppState<C, T>>, body: Bytes) -> StatusCode
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let refresh_token = serde_json::from_slice::<LogoutRequest>(&body)
        .ok()
        .and_then(|req| req.refresh_token)
        .filter(|token| !token.is_empty());

    if let Some(token) = refresh_token {
        if let Err(e) = state.lifecycle().terminate_session(&token).await {
            tracing::warn!(error = %e, "Failed to terminate session");
        }
    }

    StatusCode::NO_CONTENT
}

/// POST /api/v1/auth/logout-all
pub async fn logout_all<C, T>(
    State(state): State<AuthAppState<C, T>>,
    principal: AuthenticatedUser,
) -> AuthResult<StatusCode>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    state
        .lifecycle()
        .terminate_all_sessions(&principal.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me<C, T>(
    State(state): State<AuthAppState<C, T>>,
    principal: AuthenticatedUser,
) -> AuthResult<Json<UserResponse>>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let user = CurrentUserUseCase::new(state.users.clone())
        .execute(&principal.user_id)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /api/v1/auth/forgot-password
///
/// The answer never reveals whether the email belongs to an account.
pub async fn forgot_password<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<EmailRequest>,
) -> Json<MessageResponse>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    if let Err(e) = state.lifecycle().issue_password_reset(&req.email).await {
        tracing::error!(error = %e, "Failed to issue password reset");
    }

    Json(MessageResponse {
        message: RESET_SENT,
    })
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    state
        .lifecycle()
        .redeem_password_reset(&req.token, req.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset successfully",
    }))
}

// ============================================================================
// Email verification
// ============================================================================

/// POST /api/v1/auth/verify-email
pub async fn verify_email<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<VerifyEmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    if req.token.is_empty() {
        return Err(AuthError::InvalidToken(TokenKind::EmailVerification));
    }

    state.lifecycle().redeem_email_verification(&req.token).await?;

    Ok(Json(MessageResponse {
        message: "Email verified successfully",
    }))
}

/// POST /api/v1/auth/resend-verification
pub async fn resend_verification<C, T>(
    State(state): State<AuthAppState<C, T>>,
    JsonBody(req): JsonBody<EmailRequest>,
) -> Json<MessageResponse>
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    if let Err(e) = state.lifecycle().resend_email_verification(&req.email).await {
        tracing::error!(error = %e, "Failed to resend verification");
    }

    Json(MessageResponse {
        message: VERIFICATION_SENT,
    })
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
pub async fn health<C, T>(
    State(state): State<AuthAppState<C, T>>,
) -> (StatusCode, Json<HealthResponse>)
where
    C: CredentialStore + Send + Sync + 'static,
    T: TokenStore + RateLimitStore + Send + Sync + 'static,
{
    let report = HealthCheckUseCase::new(
        state.users.clone(),
        state.tokens.clone(),
        state.services.config.store_timeout,
    )
    .execute()
    .await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(HealthResponse::from(report)))
}
