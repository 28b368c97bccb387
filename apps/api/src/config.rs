//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Base URL of the identity service used for token verification
    pub identity_url: String,

    /// API key sent alongside verification requests (optional)
    pub identity_api_key: Option<String>,

    /// Comma-separated list of allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "venta.db".to_string());

        let identity_url = env::var("IDENTITY_URL")
            .map_err(|_| ConfigError::MissingRequired("IDENTITY_URL".to_string()))?;

        let identity_api_key = env::var("IDENTITY_API_KEY").ok();

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(ApiConfig {
            port,
            database_path,
            identity_url,
            identity_api_key,
            allowed_origins,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
