use std::time::Duration;

use gharpayy_db::PoolConfig;

use crate::auth::jwt::JwtConfig;

/// Default minimum password length for new credentials.
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Default cap on request bodies. Listings carry the largest payloads.
const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Shortest password accepted at sign-up and reset (default: `8`).
    pub min_password_length: usize,
    /// Largest accepted request body in bytes (default: 256 KiB).
    pub max_body_bytes: usize,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `MIN_PASSWORD_LENGTH`   | `8`                     |
    /// | `MAX_BODY_BYTES`        | `262144`                |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| DEFAULT_MIN_PASSWORD_LENGTH.to_string())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            min_password_length,
            max_body_bytes,
            jwt,
        }
    }
}

/// Database pool settings.
///
/// | Env Var                   | Default |
/// |---------------------------|---------|
/// | `DB_MAX_CONNECTIONS`      | `20`    |
/// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`     |
pub fn pool_config_from_env() -> PoolConfig {
    let defaults = PoolConfig::default();

    let max_connections = std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .map(|v| v.parse().expect("DB_MAX_CONNECTIONS must be a valid u32"))
        .unwrap_or(defaults.max_connections);

    let acquire_timeout = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
        .ok()
        .map(|v| {
            Duration::from_secs(
                v.parse()
                    .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64"),
            )
        })
        .unwrap_or(defaults.acquire_timeout);

    PoolConfig {
        max_connections,
        acquire_timeout,
    }
}
