use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status
    pub status: String,
    /// Service version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

/// Response for an authenticated caller.
///
/// The key itself is never echoed back; `key_hint` keeps a short prefix so a
/// client can tell which of its keys was used.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    /// Scheme the key was presented with (always `ApiKey`)
    pub scheme: String,
    /// Masked key, e.g. `abc1****`
    pub key_hint: String,
    /// Request ID for correlating with server logs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
