//! Configuration types for the auth core

use std::time::Duration;

/// Auth core configuration
///
/// Loaded once at process start and never mutated at runtime. The signing
/// secret must be at least 32 bytes; [`crate::HmacKey`] enforces this when
/// the codec is built.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret for credential signing
    pub secret: String,
    /// Issuer claim stamped into every credential
    pub issuer: String,
    /// Access credential validity
    pub access_validity: Duration,
    /// Refresh credential validity
    pub refresh_validity: Duration,
    /// Session cache entry TTL (bookkeeping window, independent of the
    /// access credential's validity)
    pub session_ttl: Duration,
    /// Session cache entry TTL when the client asked to be remembered
    pub remember_me_session_ttl: Duration,
    /// Per-round-trip timeout for revocation/session store calls
    pub store_timeout: Duration,
}

impl AuthConfig {
    /// Create a config with the default validity windows
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "sentra".to_string(),
            access_validity: Duration::from_secs(86_400),     // 24 hours
            refresh_validity: Duration::from_secs(604_800),   // 7 days
            session_ttl: Duration::from_secs(7 * 86_400),     // 7 days
            remember_me_session_ttl: Duration::from_secs(30 * 86_400),
            store_timeout: Duration::from_secs(3),
        }
    }

    /// Set the issuer claim
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set access credential validity
    #[must_use]
    pub fn with_access_validity(mut self, validity: Duration) -> Self {
        self.access_validity = validity;
        self
    }

    /// Set refresh credential validity
    #[must_use]
    pub fn with_refresh_validity(mut self, validity: Duration) -> Self {
        self.refresh_validity = validity;
        self
    }

    /// Set the session cache TTL
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the store round-trip timeout
    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("x".repeat(32));
        assert_eq!(config.access_validity, Duration::from_secs(86_400));
        assert_eq!(config.refresh_validity, Duration::from_secs(604_800));
        assert_eq!(config.issuer, "sentra");
    }

    #[test]
    fn test_builder() {
        let config = AuthConfig::new("x".repeat(32))
            .with_issuer("gateway")
            .with_access_validity(Duration::from_secs(60))
            .with_store_timeout(Duration::from_secs(1));
        assert_eq!(config.issuer, "gateway");
        assert_eq!(config.access_validity, Duration::from_secs(60));
        assert_eq!(config.store_timeout, Duration::from_secs(1));
    }
}
