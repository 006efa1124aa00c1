//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Every variant maps
//! to one status code and one stable machine-readable `error` code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::BearerError;
use platform::password::PasswordHashError;
use thiserror::Error;

use crate::domain::value_object::token_kind::TokenKind;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message returned for every server-side failure
const SERVER_ERROR_MESSAGE: &str = "An internal error occurred";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Body missing or not valid JSON
    #[error("Invalid request body")]
    InvalidRequest,

    /// Input rejected by a validation rule
    #[error("{0}")]
    Validation(String),

    /// Unknown email or wrong password; the two are indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Opaque token unknown, expired or already used
    #[error("Invalid or expired {0}")]
    InvalidToken(TokenKind),

    /// Missing or unacceptable access token
    #[error("{0}")]
    Unauthorized(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Too many requests")]
    RateLimited,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Ephemeral token store error
    #[error("Token store error: {0}")]
    Store(String),

    #[error(transparent)]
    Hashing(#[from] PasswordHashError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidRequest | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(TokenKind::Refresh) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Database(_)
            | AuthError::Store(_)
            | AuthError::Hashing(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidRequest | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::InvalidToken(TokenKind::Refresh) => ErrorKind::Unauthorized,
            AuthError::InvalidToken(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::RateLimited => ErrorKind::TooManyRequests,
            AuthError::Database(_)
            | AuthError::Store(_)
            | AuthError::Hashing(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable code for the `error` field of the response body
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidRequest => "invalid_request",
            AuthError::Validation(_) => "validation_error",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::Unauthorized(_) => "unauthorized",
            AuthError::EmailTaken => "email_exists",
            AuthError::RateLimited => "rate_limit",
            AuthError::Database(_)
            | AuthError::Store(_)
            | AuthError::Hashing(_)
            | AuthError::Internal(_) => "server_error",
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; the client gets a generic message.
    pub fn to_app_error(&self) -> AppError {
        let message = if self.kind().is_server_error() {
            SERVER_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        AppError::new(self.kind(), message).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Store(msg) => {
                tracing::error!(message = %msg, "Auth token store error");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report through `AppError`; client-side kinds are
/// validation failures, everything else is internal.
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.kind().is_client_error() {
            AuthError::Validation(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

impl From<BearerError> for AuthError {
    fn from(err: BearerError) -> Self {
        AuthError::Unauthorized(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AuthError::InvalidRequest, 400, "invalid_request")]
    #[case(AuthError::Validation("Invalid email format".into()), 400, "validation_error")]
    #[case(AuthError::InvalidCredentials, 401, "invalid_credentials")]
    #[case(AuthError::InvalidToken(TokenKind::Refresh), 401, "invalid_token")]
    #[case(AuthError::InvalidToken(TokenKind::PasswordReset), 400, "invalid_token")]
    #[case(AuthError::InvalidToken(TokenKind::EmailVerification), 400, "invalid_token")]
    #[case(AuthError::Unauthorized("Missing authorization header".into()), 401, "unauthorized")]
    #[case(AuthError::EmailTaken, 409, "email_exists")]
    #[case(AuthError::RateLimited, 429, "rate_limit")]
    #[case(AuthError::Store("connection refused".into()), 500, "server_error")]
    #[case(AuthError::Internal("boom".into()), 500, "server_error")]
    fn test_status_and_code(
        #[case] err: AuthError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code().as_u16(), status);
        assert_eq!(err.code(), code);

        let app = err.to_app_error();
        assert_eq!(app.status_code(), status);
        assert_eq!(app.code(), code);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let app = AuthError::Store("redis://secret-host refused".into()).to_app_error();
        assert_eq!(app.message(), SERVER_ERROR_MESSAGE);

        let app = AuthError::Database(sqlx::Error::PoolTimedOut).to_app_error();
        assert_eq!(app.message(), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_from_app_error() {
        let err = AuthError::from(AppError::bad_request("Invalid email format"));
        assert!(matches!(err, AuthError::Validation(msg) if msg == "Invalid email format"));

        let err = AuthError::from(AppError::internal("bad hash"));
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_invalid_token_messages() {
        assert_eq!(
            AuthError::InvalidToken(TokenKind::Refresh).to_string(),
            "Invalid or expired refresh token"
        );
        assert_eq!(
            AuthError::InvalidToken(TokenKind::PasswordReset).to_string(),
            "Invalid or expired reset token"
        );
    }
}
