//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with sensible defaults
//! for development. In production, configure via environment variables or a `.env` file.
//!
//! # Security Configuration
//!
//! - `AUTH_REQUIRED`: Install the `ApiKey` auth layer in front of every route (default: `true`)
//! - `AUTH_BYPASS_PATHS`: Exact paths that skip the auth layer (default: `/health,/ready`)
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins (default: `*` for dev)
//!
//! # Observability
//!
//! - `RUST_LOG`: Log filter (default: `info`)
//! - `LOG_FORMAT`: `text` or `json` (default: `text`)
//! - `METRICS_PORT`: Prometheus listener port, `0` disables (default: 9090)

use std::env;
use std::net::SocketAddr;

use crate::error::{AppError, AppResult};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_request_body_size: usize,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Whether the auth layer guards every non-bypassed route (default: true).
    /// Handlers taking an `ApiKey` extractor are guarded either way.
    pub auth_required: bool,

    /// Paths that bypass authentication (for health checks, monitoring).
    /// Default: ["/health", "/ready"]
    pub auth_bypass_paths: Vec<String>,

    /// Comma-separated list of allowed CORS origins
    /// Use "*" to allow all origins (not recommended for production)
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log level (e.g., "info", "debug", "trace")
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Port for Prometheus metrics endpoint (default: 9090, 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if any value is invalid
    /// (e.g., non-numeric PORT value, non-boolean AUTH_REQUIRED).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", env_var("PORT").as_deref(), 3000)?,
            max_request_body_size: Self::parse_env(
                "MAX_REQUEST_BODY_SIZE",
                env_var("MAX_REQUEST_BODY_SIZE").as_deref(),
                1024 * 1024,
            )?,

            // Security
            auth_required: Self::parse_env(
                "AUTH_REQUIRED",
                env_var("AUTH_REQUIRED").as_deref(),
                true,
            )?,
            auth_bypass_paths: Self::parse_auth_bypass_paths(
                env_var("AUTH_BYPASS_PATHS").as_deref(),
            ),
            cors_allowed_origins: Self::parse_cors_origins(),

            // Observability
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            metrics_port: Self::parse_env(
                "METRICS_PORT",
                env_var("METRICS_PORT").as_deref(),
                9090,
            )?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    fn validate(&self) -> AppResult<()> {
        if self.max_request_body_size == 0 {
            return Err(AppError::ConfigError(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address, or `None` if metrics are disabled.
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_enabled()
            .then(|| SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Parse the raw value of environment variable `name`, falling back to
    /// `default` when it is unset.
    fn parse_env<T>(name: &str, raw: Option<&str>, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match raw {
            Some(val) => val
                .trim()
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            None => Ok(default),
        }
    }

    /// Parse CORS allowed origins from environment variable.
    fn parse_cors_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Parse auth bypass paths, keeping only entries that start with `/`.
    fn parse_auth_bypass_paths(raw: Option<&str>) -> Vec<String> {
        raw.unwrap_or("/health,/ready")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s.starts_with('/'))
            .collect()
    }
}

/// Value of an environment variable, `None` when unset or not valid unicode.
fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_body_size: 1024 * 1024,
            auth_required: true,
            auth_bypass_paths: vec!["/health".to_string(), "/ready".to_string()],
            cors_allowed_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_port: 9090,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.auth_required);
        assert_eq!(config.auth_bypass_paths, vec!["/health", "/ready"]);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_metrics_addr() {
        let config = Config::default();
        assert_eq!(config.metrics_addr().unwrap().port(), 9090);

        let config = Config {
            metrics_port: 0,
            ..Config::default()
        };
        assert!(!config.metrics_enabled());
        assert!(config.metrics_addr().is_none());
    }

    #[test]
    fn test_parse_auth_bypass_paths() {
        assert_eq!(
            Config::parse_auth_bypass_paths(None),
            vec!["/health", "/ready"]
        );
        assert_eq!(
            Config::parse_auth_bypass_paths(Some(" /health , status, ,/live")),
            vec!["/health", "/live"]
        );
        assert!(Config::parse_auth_bypass_paths(Some("")).is_empty());
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        assert_eq!(Config::parse_env("PORT", None, 3000u16).unwrap(), 3000);
        assert!(Config::parse_env("AUTH_REQUIRED", None, true).unwrap());
    }

    #[test]
    fn test_parse_env_trims_value() {
        assert_eq!(Config::parse_env("PORT", Some(" 8080 "), 3000u16).unwrap(), 8080);
        assert!(!Config::parse_env("AUTH_REQUIRED", Some("false"), true).unwrap());
    }

    #[test]
    fn test_parse_env_invalid_port() {
        let err = Config::parse_env("PORT", Some("abc"), 3000u16).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("Invalid PORT"));

        // Out of range for u16
        let err = Config::parse_env("PORT", Some("70000"), 3000u16).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));
    }

    #[test]
    fn test_parse_env_invalid_auth_required() {
        let err = Config::parse_env("AUTH_REQUIRED", Some("maybe"), true).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("Invalid AUTH_REQUIRED"));

        // bool parsing is strict
        assert!(Config::parse_env("AUTH_REQUIRED", Some("yes"), true).is_err());
        assert!(Config::parse_env("AUTH_REQUIRED", Some("TRUE"), true).is_err());
    }

    #[test]
    fn test_parse_env_invalid_body_size() {
        for raw in ["-1", "big", "1.5", ""] {
            let err =
                Config::parse_env("MAX_REQUEST_BODY_SIZE", Some(raw), 1024usize).unwrap_err();
            assert!(
                err.to_string().contains("Invalid MAX_REQUEST_BODY_SIZE"),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }

    #[test]
    fn test_validate_body_size_zero() {
        let config = Config {
            max_request_body_size: 0,
            ..Config::default()
        };

        let result = config.validate();
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("MAX_REQUEST_BODY_SIZE")
        );
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }
}
