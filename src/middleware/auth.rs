//! `ApiKey` authentication layer.
//!
//! Requires every request to carry `Authorization: ApiKey <token>`, except for
//! a configurable set of bypass paths. The layer only checks that the header is
//! well formed; on success the token is stored in request extensions as
//! [`ApiKey`] so handlers can pick it up without parsing again.
//!
//! ```bash
//! curl -H "Authorization: ApiKey abc123" http://localhost:3000/whoami
//! ```
//!
//! # Bypassed Endpoints
//!
//! By default `/health` and `/ready` are accessible without a key so that
//! load balancer and Kubernetes health checks keep working.
//!
//! # Path Matching Behavior
//!
//! Bypass paths use **exact string matching** against `request.uri().path()`:
//! - `/health` is bypassed, but `/health/` (trailing slash) is NOT
//! - `/ready?foo=bar` IS bypassed (query params are not part of the path)
//! - `/HEALTH` (uppercase) is NOT bypassed

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::auth::{ApiKey, get_api_key};
use crate::error::unauthorized_response;
use crate::metrics;
use crate::middleware::request_id::request_id;

/// Default paths that bypass authentication.
const DEFAULT_BYPASS_PATHS: [&str; 2] = ["/health", "/ready"];

/// API key authentication layer.
///
/// When disabled, all requests pass through untouched.
#[derive(Clone)]
pub struct ApiKeyAuth {
    enabled: bool,
    bypass_paths: Arc<Vec<String>>,
}

impl ApiKeyAuth {
    /// Create a new auth layer.
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether requests must carry a well-formed `ApiKey` header
    /// * `bypass_paths` - Paths that skip the check (e.g., health endpoints)
    pub fn new(enabled: bool, bypass_paths: Vec<String>) -> Self {
        Self {
            enabled,
            bypass_paths: Arc::new(bypass_paths),
        }
    }

    /// Create an enabled layer with default bypass paths ("/health", "/ready").
    pub fn with_defaults() -> Self {
        Self::new(
            true,
            DEFAULT_BYPASS_PATHS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        )
    }

    /// Check if authentication is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check if a path skips authentication.
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass_paths.iter().any(|p| p == path)
    }
}

impl<S> Layer<S> for ApiKeyAuth {
    type Service = ApiKeyAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyAuthService {
            inner,
            auth: self.clone(),
        }
    }
}

/// API key authentication service wrapper.
#[derive(Clone)]
pub struct ApiKeyAuthService<S> {
    inner: S,
    auth: ApiKeyAuth,
}

impl<S> Service<Request<Body>> for ApiKeyAuthService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let auth = self.auth.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !auth.is_enabled() {
                return inner.call(req).await;
            }

            let path = req.uri().path();
            if auth.is_bypassed(path) {
                debug!(path, "Bypassing auth for configured path");
                metrics::record_bypass();
                return inner.call(req).await;
            }

            let result = get_api_key(req.headers());
            metrics::record_extraction(result.map(|_| ()));

            match result.map(str::to_string) {
                Ok(key) => {
                    debug!("API key extracted");
                    req.extensions_mut().insert(ApiKey(key));
                    inner.call(req).await
                }
                Err(e) => {
                    warn!(
                        path = %req.uri().path(),
                        request_id = request_id(req.headers()).unwrap_or_default(),
                        reason = e.code(),
                        "Rejecting request: {e}"
                    );
                    Ok(unauthorized_response(e))
                }
            }
        })
    }
}
