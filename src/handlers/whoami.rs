//! Endpoint reporting the caller's authentication status.

use axum::Json;
use axum::http::HeaderMap;
use tracing::{debug, instrument};

use crate::auth::{API_KEY_SCHEME, ApiKey};
use crate::error::AppResult;
use crate::middleware::request_id;
use crate::models::WhoAmIResponse;

/// Number of leading key characters left visible in `key_hint`.
const KEY_HINT_VISIBLE: usize = 4;

/// Return a masked view of the API key used for this request.
///
/// Fails with `401` (via the [`ApiKey`] extractor) when the request carries
/// no well-formed `ApiKey` header, whether or not the auth layer is installed.
#[instrument(skip_all)]
pub async fn whoami(ApiKey(key): ApiKey, headers: HeaderMap) -> AppResult<Json<WhoAmIResponse>> {
    let request_id = request_id(&headers).map(str::to_string);

    debug!(request_id = ?request_id, "Authenticated caller");

    Ok(Json(WhoAmIResponse {
        authenticated: true,
        scheme: API_KEY_SCHEME.to_string(),
        key_hint: key_hint(&key),
        request_id,
    }))
}

/// Mask all but the first few characters of a key.
///
/// Keys no longer than twice the visible prefix are masked entirely so that
/// short keys are not effectively disclosed.
pub fn key_hint(key: &str) -> String {
    let len = key.chars().count();
    if len <= KEY_HINT_VISIBLE * 2 {
        return "*".repeat(len);
    }

    let visible: String = key.chars().take(KEY_HINT_VISIBLE).collect();
    format!("{visible}{}", "*".repeat(len - KEY_HINT_VISIBLE))
}
