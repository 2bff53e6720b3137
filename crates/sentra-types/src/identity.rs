//! Identity types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub i64);

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for IdentityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Tenant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub i64);

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TenantId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A resolved identity: who the caller is and what they may do.
///
/// Resolved by the directory once per login or refresh. Role and permission
/// sets are snapshots; a refresh re-resolves them rather than trusting the
/// old credential's claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub display_name: String,
    pub tenant_id: TenantId,
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

impl Identity {
    /// Create an identity with empty role/permission sets
    pub fn new(id: IdentityId, display_name: impl Into<String>, tenant_id: TenantId) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            tenant_id,
            roles: BTreeSet::new(),
            permissions: BTreeSet::new(),
        }
    }

    /// Add a role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Add a permission
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Membership test against the role set
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Membership test against the permission set
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_builder() {
        let identity = Identity::new(IdentityId(1), "admin", TenantId(1))
            .with_role("ADMIN")
            .with_permission("system:user:list");

        assert_eq!(identity.id, IdentityId(1));
        assert!(identity.has_role("ADMIN"));
        assert!(!identity.has_role("USER"));
        assert!(identity.has_permission("system:user:list"));
        assert!(!identity.has_permission("system:user:delete"));
    }

    #[test]
    fn test_identity_id_display() {
        assert_eq!(IdentityId(42).to_string(), "42");
        assert_eq!(TenantId(7).to_string(), "7");
    }
}
