//! Prometheus metrics for authentication outcomes.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `apikey_gate_extractions_total` - API key extractions (label: `outcome` =
//!   `ok`, `no_auth_header`, `malformed_header`)
//! - `apikey_gate_bypassed_requests_total` - Requests that skipped auth via a bypass path
//!
//! Recording functions are safe to call before [`init_metrics`]; without an
//! installed recorder they are no-ops.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

use crate::auth::AuthError;

/// Metric names as constants for consistency.
pub mod names {
    pub const EXTRACTIONS_TOTAL: &str = "apikey_gate_extractions_total";
    pub const BYPASSED_REQUESTS_TOTAL: &str = "apikey_gate_bypassed_requests_total";
}

/// Initialize the Prometheus metrics exporter on `metrics_addr`.
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::EXTRACTIONS_TOTAL,
        "Total number of API key extractions by outcome"
    );
    describe_counter!(
        names::BYPASSED_REQUESTS_TOTAL,
        "Total number of requests that bypassed authentication"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Label value for an extraction result.
pub fn outcome_label(result: Result<(), AuthError>) -> &'static str {
    match result {
        Ok(()) => "ok",
        Err(e) => e.code(),
    }
}

/// Record the outcome of one API key extraction.
pub fn record_extraction(result: Result<(), AuthError>) {
    counter!(names::EXTRACTIONS_TOTAL, "outcome" => outcome_label(result)).increment(1);
}

/// Record a request that skipped authentication.
pub fn record_bypass() {
    counter!(names::BYPASSED_REQUESTS_TOTAL).increment(1);
}
