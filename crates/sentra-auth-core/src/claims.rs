//! Credential claims
//!
//! Access and refresh credentials are separate variants of one sum type,
//! discriminated on the wire by the `kind` field. Only access claims carry
//! tenancy and roles; a refresh credential structurally cannot answer a
//! role query.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use sentra_types::{Identity, IdentityId, TenantId};

/// Credential kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by an access credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub tenant_id: TenantId,
    pub roles: BTreeSet<String>,
    /// Epoch milliseconds
    pub issued_at: i64,
    /// Epoch milliseconds
    pub expires_at: i64,
    pub issuer: String,
}

/// Claims carried by a refresh credential.
///
/// Deliberately reduced: no tenancy, no roles. Refresh re-resolves the
/// identity instead of trusting stale claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub identity_id: IdentityId,
    pub display_name: String,
    /// Epoch milliseconds
    pub issued_at: i64,
    /// Epoch milliseconds
    pub expires_at: i64,
    pub issuer: String,
}

/// A credential's claims, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Claims {
    Access(AccessClaims),
    Refresh(RefreshClaims),
}

impl Claims {
    /// Build access claims for an identity.
    ///
    /// `issued_at = now`, `expires_at = now + validity`. Issuance is atomic:
    /// every claim is set here or the value is never constructed.
    pub fn access(identity: &Identity, issuer: impl Into<String>, validity: Duration) -> Self {
        let now = Utc::now().timestamp_millis();
        Self::Access(AccessClaims {
            identity_id: identity.id,
            display_name: identity.display_name.clone(),
            tenant_id: identity.tenant_id,
            roles: identity.roles.clone(),
            issued_at: now,
            expires_at: expiry_millis(now, validity),
            issuer: issuer.into(),
        })
    }

    /// Build refresh claims for an identity
    pub fn refresh(identity: &Identity, issuer: impl Into<String>, validity: Duration) -> Self {
        let now = Utc::now().timestamp_millis();
        Self::Refresh(RefreshClaims {
            identity_id: identity.id,
            display_name: identity.display_name.clone(),
            issued_at: now,
            expires_at: expiry_millis(now, validity),
            issuer: issuer.into(),
        })
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Access(_) => TokenKind::Access,
            Self::Refresh(_) => TokenKind::Refresh,
        }
    }

    pub fn identity_id(&self) -> IdentityId {
        match self {
            Self::Access(c) => c.identity_id,
            Self::Refresh(c) => c.identity_id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Access(c) => &c.display_name,
            Self::Refresh(c) => &c.display_name,
        }
    }

    /// Epoch milliseconds
    pub fn issued_at(&self) -> i64 {
        match self {
            Self::Access(c) => c.issued_at,
            Self::Refresh(c) => c.issued_at,
        }
    }

    /// Epoch milliseconds
    pub fn expires_at(&self) -> i64 {
        match self {
            Self::Access(c) => c.expires_at,
            Self::Refresh(c) => c.expires_at,
        }
    }

    /// Check whether the credential is past its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at()
    }

    /// Remaining validity, or `None` if already expired.
    ///
    /// This bounds a revocation entry's TTL so the entry never outlives the
    /// credential it blocks.
    pub fn remaining_validity(&self) -> Option<Duration> {
        let remaining = self.expires_at() - Utc::now().timestamp_millis();
        if remaining > 0 {
            Some(Duration::from_millis(remaining as u64))
        } else {
            None
        }
    }
}

/// `now + validity` in epoch millis, saturating at `i64::MAX`.
///
/// An oversized configured validity pins the expiry to the far future
/// instead of wrapping it into the past.
fn expiry_millis(now: i64, validity: Duration) -> i64 {
    let millis = i64::try_from(validity.as_millis()).unwrap_or(i64::MAX);
    now.saturating_add(millis)
}
