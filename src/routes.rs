//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (outermost first)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← Adds X-Request-Id header
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Authentication  │ ← 401 if header missing/malformed (bypassed for /health, /ready)
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │      CORS        │ ← Cross-origin headers
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::{ApiKeyAuth, RequestIdLayer};
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
///
/// The auth layer is installed only when `auth_required` is set; `/whoami`
/// is guarded by its extractor regardless.
pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let cors = build_cors_layer(&config.cors_allowed_origins);

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/whoami", get(handlers::whoami));

    // Applied bottom to top: the last layer added runs first
    router = router.layer(DefaultBodyLimit::max(config.max_request_body_size));
    router = router.layer(cors);
    router = router.layer(TraceLayer::new_for_http());

    let auth_layer = ApiKeyAuth::new(config.auth_required, config.auth_bypass_paths.clone());
    if auth_layer.is_enabled() {
        info!(
            bypass_paths = ?config.auth_bypass_paths,
            "ApiKey authentication enabled"
        );
        router = router.layer(auth_layer);
    } else {
        info!("ApiKey authentication layer disabled (AUTH_REQUIRED=false)");
    }

    // Outermost, so auth rejections carry the request ID too
    router = router.layer(RequestIdLayer::new());

    router.with_state(state)
}

/// Build CORS layer from configuration.
///
/// `["*"]` allows any origin; otherwise unparseable origins are skipped.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_any = allowed_origins.iter().any(|o| o == "*");

    if allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
