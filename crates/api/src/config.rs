//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Secret used to sign JWTs.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub token_expiry_secs: u64,
    /// Allowed CORS origin, if any.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `PORT` | Server port (bound on 0.0.0.0) | `5000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:mandalog.db?mode=rwc` |
    /// | `JWT_SECRET` | JWT signing secret | (required) |
    /// | `TOKEN_EXPIRY_SECS` | Token lifetime | `604800` (7 days) |
    /// | `CORS_ORIGIN` | Allowed CORS origin | (none) |
    ///
    /// The model backend is configured separately via the `OPENAI_*`
    /// variables read by `openai-insight`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:mandalog.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;

        let token_expiry_secs = env::var("TOKEN_EXPIRY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604_800);

        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            addr,
            database_url,
            jwt_secret,
            token_expiry_secs,
            cors_origin,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("JWT_SECRET environment variable is required")]
    MissingJwtSecret,
}
