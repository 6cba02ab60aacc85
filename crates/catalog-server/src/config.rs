//! Server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify JWTs.
    pub jwt_secret: String,
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Path of the request log file.
    pub request_log_path: String,
    /// Maximum requests per client within one rate-limit window.
    pub rate_limit_max_requests: u32,
    /// Length of the rate-limit window in seconds.
    pub rate_limit_window_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `JWT_SECRET`: token signing secret
    ///
    /// Optional:
    /// - `PORT`: server port (default: 3000)
    /// - `LOG_LEVEL`: logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: allowed CORS origins (default: "*")
    /// - `REQUEST_LOG_PATH`: request log file (default: "logs.json")
    /// - `RATE_LIMIT_MAX_REQUESTS`: requests per window (default: 100)
    /// - `RATE_LIMIT_WINDOW_SECS`: window length (default: 900)
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let request_log_path =
            env::var("REQUEST_LOG_PATH").unwrap_or_else(|_| "logs.json".to_string());

        let rate_limit_max_requests = env::var("RATE_LIMIT_MAX_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        let rate_limit_window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(900);

        Ok(Self {
            jwt_secret,
            port,
            log_level,
            cors_allowed_origins,
            request_log_path,
            rate_limit_max_requests,
            rate_limit_window_secs,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Length of the rate-limit window.
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
}
