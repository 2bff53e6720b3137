//! Revocation store and session cache
//!
//! Both are shared key/value stores with per-key expiry, assumed safe for
//! concurrent per-key access; no cross-key transactions are needed. The
//! auth service is the only writer. The in-memory implementations here back
//! single-process deployments and tests; a networked store implements the
//! same traits.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

use sentra_types::IdentityId;

/// Store transport failure.
///
/// Surfaced to callers as `RevocationStoreUnavailable`; never collapsed
/// into "not revoked".
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Marks access credentials as revoked until their natural expiry.
///
/// Keys are credential hashes (see [`crate::hash_token`]); the store's own
/// TTL mechanism owns deletion, so an entry vanishes exactly when the
/// credential it blocks would have expired anyway.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Create a revocation entry that expires after `ttl`
    async fn put(&self, key: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Existence probe
    async fn contains(&self, key: &str) -> Result<bool, StoreError>;
}

/// Remembers the most-recently-issued access credential per identity.
///
/// Bookkeeping only, never the revocation authority: a login racing a
/// refresh may leave either credential here and both remain valid.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Overwrite the cached credential for an identity
    async fn put(&self, identity_id: IdentityId, token: &str, ttl: Duration)
        -> Result<(), StoreError>;

    /// Latest cached credential, if any
    async fn get(&self, identity_id: IdentityId) -> Result<Option<String>, StoreError>;

    /// Drop the entry for an identity
    async fn remove(&self, identity_id: IdentityId) -> Result<(), StoreError>;
}

/// Per-entry TTL policy: each value carries its own lifetime.
struct EntryTtl;

impl<K> Expiry<K, RevocationEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &K,
        value: &RevocationEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

impl<K> Expiry<K, SessionEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &K,
        value: &SessionEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Debug, Clone)]
struct RevocationEntry {
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    token: String,
    ttl: Duration,
}

/// In-memory revocation store with TTL-driven auto-cleanup.
#[derive(Clone)]
pub struct MemoryRevocationStore {
    entries: Cache<String, RevocationEntry>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().expire_after(EntryTtl).build(),
        }
    }
}

impl Default for MemoryRevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn put(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        self.entries
            .insert(key.to_string(), RevocationEntry { ttl })
            .await;
        Ok(())
    }

    async fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.get(key).await.is_some())
    }
}

/// In-memory session cache with TTL-driven auto-cleanup.
#[derive(Clone)]
pub struct MemorySessionCache {
    entries: Cache<IdentityId, SessionEntry>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().expire_after(EntryTtl).build(),
        }
    }
}

impl Default for MemorySessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn put(
        &self,
        identity_id: IdentityId,
        token: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        self.entries
            .insert(
                identity_id,
                SessionEntry {
                    token: token.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn get(&self, identity_id: IdentityId) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(&identity_id).await.map(|e| e.token))
    }

    async fn remove(&self, identity_id: IdentityId) -> Result<(), StoreError> {
        self.entries.invalidate(&identity_id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revocation_entry_expires() {
        let store = MemoryRevocationStore::new();
        store.put("k1", Duration::from_millis(50)).await.unwrap();
        assert!(store.contains("k1").await.unwrap());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!store.contains("k1").await.unwrap());
    }

    #[tokio::test]
    async fn test_revocation_put_idempotent() {
        let store = MemoryRevocationStore::new();
        store.put("k1", Duration::from_secs(60)).await.unwrap();
        store.put("k1", Duration::from_secs(60)).await.unwrap();
        assert!(store.contains("k1").await.unwrap());
        assert!(!store.contains("k2").await.unwrap());
    }

    #[tokio::test]
    async fn test_session_cache_overwrite_and_remove() {
        let cache = MemorySessionCache::new();
        let id = IdentityId(1);

        cache.put(id, "token-a", Duration::from_secs(60)).await.unwrap();
        cache.put(id, "token-b", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(id).await.unwrap().as_deref(), Some("token-b"));

        cache.remove(id).await.unwrap();
        assert_eq!(cache.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_entry_expires() {
        let cache = MemorySessionCache::new();
        let id = IdentityId(2);
        cache.put(id, "token", Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_independent_keys_do_not_contend() {
        let cache = MemorySessionCache::new();
        let store = MemoryRevocationStore::new();

        let mut tasks = Vec::new();
        for i in 0..16i64 {
            let cache = cache.clone();
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .put(IdentityId(i), &format!("token-{i}"), Duration::from_secs(60))
                    .await
                    .unwrap();
                store
                    .put(&format!("revoked-{i}"), Duration::from_secs(60))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        for i in 0..16i64 {
            assert_eq!(
                cache.get(IdentityId(i)).await.unwrap().as_deref(),
                Some(format!("token-{i}").as_str())
            );
            assert!(store.contains(&format!("revoked-{i}")).await.unwrap());
        }
    }
}
