//! # apikey_gate
//!
//! Extraction of API keys from `Authorization: ApiKey <token>` headers, plus
//! the Axum pieces that put it in front of a service:
//!
//! - [`auth::get_api_key`]: pure header parser returning the token or an
//!   [`AuthError`] saying why there is none
//! - [`auth::ApiKey`]: request extractor rejecting with `401`
//! - [`middleware::ApiKeyAuth`]: tower layer guarding whole routers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Request ID → Auth → Trace → CORS)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (health, ready, whoami)                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  get_api_key (header → token | AuthError)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apikey_gate::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let app = build_router(AppState::new(config.clone()));
//!
//!     let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! Using the parser directly:
//!
//! ```rust
//! use apikey_gate::{AuthError, get_api_key};
//! use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
//!
//! let mut headers = HeaderMap::new();
//! assert_eq!(get_api_key(&headers), Err(AuthError::NoAuthHeader));
//!
//! headers.insert(AUTHORIZATION, HeaderValue::from_static("ApiKey abc123"));
//! assert_eq!(get_api_key(&headers), Ok("abc123"));
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-exports for convenience
pub use auth::{ApiKey, AuthError, get_api_key};
pub use config::{Config, LogFormat};
pub use error::{AppError, AppResult};
pub use routes::build_router;
pub use state::AppState;
