//! Identity directory
//!
//! The directory is an external collaborator: given a username or an
//! identity id it returns the resolved identity and, for username lookups,
//! the stored password hash. Persistent user storage lives behind this
//! trait, out of scope for the auth core.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use sentra_types::{Identity, IdentityId};

use crate::error::AuthError;

/// Directory lookup failure (transport, not "absent")
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// A directory record: the resolved identity plus its credential hash
#[derive(Debug, Clone)]
pub struct DirectoryRecord {
    pub identity: Identity,
    pub password_hash: String,
}

/// Identity directory lookup interface
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolve by username, for login
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryRecord>, DirectoryError>;

    /// Re-resolve by id, for refresh (roles/permissions may have changed)
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, DirectoryError>;
}

/// Hash a password with argon2id for directory storage
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored argon2 hash.
///
/// An unparseable stored hash verifies as `false` rather than erroring;
/// the caller only learns "credential invalid".
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("stored password hash is unparseable");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// In-memory directory for single-process deployments and tests.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    by_username: Arc<DashMap<String, DirectoryRecord>>,
    by_id: Arc<DashMap<IdentityId, String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. The username is the lookup key; the
    /// identity's display name may differ.
    pub fn insert(&self, username: impl Into<String>, record: DirectoryRecord) {
        let username = username.into();
        self.by_id.insert(record.identity.id, username.clone());
        self.by_username.insert(username, record);
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryRecord>, DirectoryError> {
        Ok(self.by_username.get(username).map(|r| r.value().clone()))
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, DirectoryError> {
        Ok(self.by_id.get(&id).and_then(|username| {
            self.by_username
                .get(username.value())
                .map(|r| r.identity.clone())
        }))
    }
}
