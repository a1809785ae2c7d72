use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::auth::{API_KEY_SCHEME, AuthError};

/// Application-wide error types with appropriate HTTP status codes.
///
/// Authentication failures keep their [`AuthError`] kind so that handlers
/// and middleware can branch on it without comparing strings.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Error response body for API endpoints.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Unauthorized(kind) => {
                tracing::debug!(reason = kind.code(), "Request unauthorized");
                return unauthorized_response(*kind);
            }

            // Never expose internal details to clients
            AppError::ConfigError(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    "Service configuration error. Please contact support.",
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: message.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Build a `401 Unauthorized` response for an extraction failure.
///
/// Shared by the [`AppError`] conversion and the auth layer so that both
/// produce the same body and `WWW-Authenticate` challenge.
pub fn unauthorized_response(kind: AuthError) -> Response {
    let body = ErrorResponse {
        error: kind.code().to_string(),
        message: kind.to_string(),
    };

    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, API_KEY_SCHEME)],
        axum::Json(body),
    )
        .into_response()
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
