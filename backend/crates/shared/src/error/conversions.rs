//! Error conversions
//!
//! HTTP rendering of [`AppError`] as `{"error": code, "message": message}`.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "error": self.code(),
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "axum")]
    #[test]
    fn test_response_status_and_shape() {
        use super::*;
        use axum::response::IntoResponse;

        let response = AppError::unauthorized("Invalid email or password")
            .with_code("invalid_credentials")
            .into_response();
        assert_eq!(response.status().as_u16(), 401);
    }
}
