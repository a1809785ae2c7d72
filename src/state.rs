//! Shared application state for Axum handlers.
//!
//! The state is cloned for every request, so everything inside is either
//! `Copy` or behind an `Arc`. There is no mutable state: extracting a key
//! never needs coordination between requests.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    /// Timestamp when the application started
    pub started_at: Instant,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            started_at: Instant::now(),
            config: Arc::new(config),
        }
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
