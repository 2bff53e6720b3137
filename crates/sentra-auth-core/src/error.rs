//! Auth errors

use thiserror::Error;

/// Authentication errors
///
/// Every variant carries a stable numeric domain code (see [`AuthError::code`])
/// so callers across service boundaries can match on it without parsing
/// messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong password for an existing identity
    #[error("invalid username or password")]
    InvalidCredential,

    /// No identity for the given username or id
    #[error("identity not found")]
    IdentityNotFound,

    /// Malformed credential or wrong credential kind
    #[error("invalid token")]
    InvalidToken,

    /// Signature does not verify against the shared secret
    #[error("invalid signature")]
    InvalidSignature,

    /// Credential past its expiry
    #[error("token expired")]
    TokenExpired,

    /// No usable credential on the request
    #[error("authentication required")]
    Unauthenticated,

    /// Revocation or session store unreachable / timed out.
    ///
    /// Never collapsed into "not revoked": logout succeeding must imply the
    /// credential is revoked or already expired.
    #[error("revocation store unavailable")]
    RevocationStoreUnavailable,

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable numeric domain code
    pub fn code(&self) -> u16 {
        match self {
            Self::IdentityNotFound => 1001,
            Self::InvalidCredential => 1002,
            Self::TokenExpired => 1005,
            Self::InvalidToken => 1006,
            Self::InvalidSignature => 1007,
            Self::Unauthenticated => 401,
            Self::RevocationStoreUnavailable => 1503,
            Self::Internal(_) => 500,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredential
            | Self::InvalidToken
            | Self::InvalidSignature
            | Self::TokenExpired
            | Self::Unauthenticated => 401,
            Self::IdentityNotFound => 404,
            Self::RevocationStoreUnavailable => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::IdentityNotFound => "IDENTITY_NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::RevocationStoreUnavailable => "REVOCATION_STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
