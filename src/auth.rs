//! `Authorization: ApiKey <token>` header extraction.
//!
//! This is the only place that understands the shape of the header. Everything
//! else (the tower layer, the axum extractor, the handlers) goes through
//! [`get_api_key`].
//!
//! # Accepted Format
//!
//! ```text
//! Authorization: ApiKey abc123
//! ```
//!
//! - The scheme must be exactly `ApiKey` (case-sensitive)
//! - The value must split on whitespace into exactly two tokens
//! - The token is returned as-is, with no normalization
//!
//! Only the shape is checked here. Whether the key is known to anyone is up to
//! the caller.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use thiserror::Error;
use tracing::warn;

use crate::error::AppError;
use crate::metrics;

/// Scheme that must prefix the key in the `Authorization` header.
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Why no API key could be extracted from a set of headers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthError {
    /// The `Authorization` header is absent or empty.
    #[error("no authorization header included")]
    NoAuthHeader,

    /// The header is present but is not `ApiKey <token>`.
    #[error("malformed authorization header")]
    MalformedHeader,
}

impl AuthError {
    /// Stable machine-readable code, used in JSON error bodies and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NoAuthHeader => "no_auth_header",
            AuthError::MalformedHeader => "malformed_header",
        }
    }
}

/// Extract the API key from an `Authorization: ApiKey <token>` header.
///
/// Header lookup is case-insensitive; the scheme comparison is not. When the
/// header appears more than once, only the first value is considered.
///
/// # Errors
///
/// - [`AuthError::NoAuthHeader`] if the header is missing or empty
/// - [`AuthError::MalformedHeader`] for a wrong scheme, a missing token,
///   extra tokens, or a value that is not visible ASCII
pub fn get_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::NoAuthHeader),
    };

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(API_KEY_SCHEME), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Extractor for the API key of an authenticated request.
///
/// Rejects with `401 Unauthorized` when [`get_api_key`] fails.
///
/// ```rust,ignore
/// async fn handler(ApiKey(key): ApiKey) -> String {
///     format!("key has {} characters", key.len())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(pub String);

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The auth layer already did the work
        if let Some(key) = parts.extensions.get::<ApiKey>() {
            return Ok(key.clone());
        }

        let result = get_api_key(&parts.headers);
        metrics::record_extraction(result.map(|_| ()));

        match result {
            Ok(key) => Ok(ApiKey(key.to_string())),
            Err(e) => {
                warn!(path = %parts.uri.path(), reason = e.code(), "Rejecting request: {e}");
                Err(AppError::Unauthorized(e))
            }
        }
    }
}
