//! Identity context for the current request
//!
//! Populated by the edge filter from verified access-credential claims (or
//! built in-process from a validated credential) and read through the
//! extractors. Owned per request; nothing here is shared across workers.

use std::collections::BTreeSet;

use sentra_auth_core::{AccessClaims, Claims};
use sentra_types::{Identity, IdentityId, TenantId};

/// Verified identity attributes for one request.
///
/// Roles come from the access credential; permissions are only present when
/// the context was built from a full directory resolution (the credential
/// does not carry them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub tenant_id: TenantId,
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

impl AuthContext {
    /// Membership test against the role set; `false` when the role is absent
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Membership test against the permission set
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

impl From<&AccessClaims> for AuthContext {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            identity_id: claims.identity_id,
            display_name: claims.display_name.clone(),
            tenant_id: claims.tenant_id,
            roles: claims.roles.clone(),
            permissions: BTreeSet::new(),
        }
    }
}

impl From<&Identity> for AuthContext {
    fn from(identity: &Identity) -> Self {
        Self {
            identity_id: identity.id,
            display_name: identity.display_name.clone(),
            tenant_id: identity.tenant_id,
            roles: identity.roles.clone(),
            permissions: identity.permissions.clone(),
        }
    }
}

impl TryFrom<&Claims> for AuthContext {
    type Error = ();

    /// Only access claims carry enough to build a context
    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        match claims {
            Claims::Access(access) => Ok(Self::from(access)),
            Claims::Refresh(_) => Err(()),
        }
    }
}
