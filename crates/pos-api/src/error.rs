//! Maps domain `AppError` to HTTP responses.
//!
//! Credential and token failures collapse to two generic 401 bodies so the
//! caller cannot tell which check rejected them. Persistence and internal
//! failures are logged in full and answered with a generic 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use pos_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Wire-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self(AppError::validation(err.to_string()))
    }
}

impl ApiError {
    /// Status, error code, and the message safe to show the caller.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        let err = &self.0;
        match err.kind {
            kind if kind.is_authentication_failure() => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid credentials".to_string(),
            ),
            kind if kind.is_token_failure() => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token".to_string(),
            ),
            ErrorKind::IdentityNotFound => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token".to_string(),
            ),
            ErrorKind::DuplicateIdentity => (
                StatusCode::CONFLICT,
                "CONFLICT",
                "Username or email is already registered".to_string(),
            ),
            ErrorKind::Validation => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                err.message.clone(),
            ),
            ErrorKind::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                err.message.clone(),
            ),
            ErrorKind::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Request timed out".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();

        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!(
                kind = %self.0.kind,
                error = %self.0.message,
                source = ?self.0.source,
                "Request failed"
            );
        } else {
            tracing::debug!(kind = %self.0.kind, error = %self.0.message, "Request rejected");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}
