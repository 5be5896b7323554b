//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::common::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => ApiError::Unauthenticated,
            AuthError::InvalidCode => ApiError::BadRequest("Invalid OTP".to_string()),
            // Provider text stays in the logs
            AuthError::DeliveryFailed(_) => {
                ApiError::BadRequest("Failed to send verification code".to_string())
            }
            AuthError::ProviderError(_) => ApiError::BadRequest("Failed to verify code".to_string()),
            AuthError::InternalError(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.as_str()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, axum::Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_statuses() {
        let cases = [
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCode, StatusCode::BAD_REQUEST),
            (AuthError::DeliveryFailed("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::ProviderError("x".into()), StatusCode::BAD_REQUEST),
            (
                AuthError::InternalError(anyhow::anyhow!("db down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_provider_message_not_exposed() {
        let err = ApiError::from(AuthError::DeliveryFailed("account AC123 suspended".into()));
        assert_eq!(err.to_string(), "Failed to send verification code");
    }
}
