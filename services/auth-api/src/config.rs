//! Configuration for the Auth API service.

use sentra_auth_core::AuthConfig;
use std::time::Duration;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Check the revocation store on every request instead of trusting
    /// local verification alone
    pub store_checked_edge: bool,

    /// Password for the seeded admin identity
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Signing secret (minimum 32 bytes)
        let session_secret =
            std::env::var("SESSION_SECRET").map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;

        if session_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "SESSION_SECRET must be at least 32 characters",
            ));
        }

        let issuer = std::env::var("TOKEN_ISSUER").unwrap_or_else(|_| "sentra".to_string());

        // Credential validity windows (defaults: 24h access, 7d refresh)
        let access_validity_secs: u64 = std::env::var("ACCESS_VALIDITY_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_VALIDITY_SECS"))?;

        let refresh_validity_secs: u64 = std::env::var("REFRESH_VALIDITY_SECS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_VALIDITY_SECS"))?;

        // Store round-trip timeout (default 3 seconds)
        let store_timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("STORE_TIMEOUT_SECS"))?;

        let store_checked_edge = std::env::var("STORE_CHECKED_EDGE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

        let auth = AuthConfig::new(session_secret)
            .with_issuer(issuer)
            .with_access_validity(Duration::from_secs(access_validity_secs))
            .with_refresh_validity(Duration::from_secs(refresh_validity_secs))
            .with_store_timeout(Duration::from_secs(store_timeout_secs));

        Ok(Self {
            http_port,
            auth,
            store_checked_edge,
            admin_password,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
