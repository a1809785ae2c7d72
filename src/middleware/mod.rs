//! HTTP middleware for authentication and request correlation.
//!
//! # Architecture
//!
//! ```text
//! Request → Request ID → Auth → Handler → Response
//!               ↓          ↓
//!     X-Request-Id header  401 Unauth
//! ```

pub mod auth;
pub mod request_id;

pub use auth::ApiKeyAuth;
pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer, request_id};
