//! Credential issuer
//!
//! Builds access/refresh claims for a resolved identity and hands them to
//! the codec. Validity durations and the signing key are process-start
//! configuration; nothing here mutates at runtime.

use std::time::Duration;

use sentra_types::Identity;

use crate::claims::Claims;
use crate::codec::TokenCodec;
use crate::error::AuthError;

/// Issues signed access and refresh credentials.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    issuer: String,
    access_validity: Duration,
    refresh_validity: Duration,
}

impl TokenIssuer {
    pub fn new(
        codec: TokenCodec,
        issuer: impl Into<String>,
        access_validity: Duration,
        refresh_validity: Duration,
    ) -> Self {
        Self {
            codec,
            issuer: issuer.into(),
            access_validity,
            refresh_validity,
        }
    }

    /// Issue a short-lived access credential carrying tenancy and roles
    pub fn issue_access(&self, identity: &Identity) -> Result<String, AuthError> {
        let claims = Claims::access(identity, &self.issuer, self.access_validity);
        self.codec.encode(&claims)
    }

    /// Issue a long-lived refresh credential with the reduced claim set
    pub fn issue_refresh(&self, identity: &Identity) -> Result<String, AuthError> {
        let claims = Claims::refresh(identity, &self.issuer, self.refresh_validity);
        self.codec.encode(&claims)
    }

    /// Access validity as whole seconds, for `expiresIn` responses
    pub fn access_validity_secs(&self) -> u64 {
        self.access_validity.as_secs()
    }
}
