//! Cryptographic primitives for credential signing
//!
//! Signature comparison is constant time; this is a correctness requirement
//! of the codec, not an optimization.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Pre-validated HMAC-SHA256 key for repeated signing.
///
/// Validates key length once at construction; cloning is cheap (shared
/// bytes) so the same key can serve the issuer, the auth service and every
/// edge filter instance.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a new HMAC key from bytes.
    ///
    /// # Errors
    /// Returns an error if the key is shorter than 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, HmacKeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(HmacKeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; 32] {
        // Cannot fail: key length validated in new()
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key_bytes)
            .expect("HMAC key length already validated");
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let expected = self.sign(data);
        constant_time_eq(&expected, signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when creating an HMAC key
#[derive(Debug, Clone, thiserror::Error)]
pub enum HmacKeyError {
    #[error("HMAC key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}

/// Constant-time byte slice comparison.
///
/// Length is not secret: differing lengths return `false` immediately.
/// Content comparison runs in constant time via `subtle`.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Hash a credential string for use as a revocation-store key.
///
/// SHA-256, hex encoded. Keeps raw credentials out of the store while the
/// key remains stable for the credential's lifetime.
pub fn hash_token(token: &str) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc123", b"abc123"));
        assert!(!constant_time_eq(b"abc123", b"abc124"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_hmac_key_too_short() {
        assert!(matches!(
            HmacKey::new("short"),
            Err(HmacKeyError::KeyTooShort { .. })
        ));
    }

    #[test]
    fn test_hmac_key_valid() {
        assert!(HmacKey::new("a".repeat(32)).is_ok());
        assert!(HmacKey::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn test_hmac_sign_verify() {
        let key = HmacKey::new("0123456789abcdef0123456789abcdef").unwrap();
        let data = b"payload to sign";
        let signature = key.sign(data);
        assert!(key.verify(data, &signature));
        assert!(!key.verify(b"other payload", &signature));
    }

    #[test]
    fn test_different_keys_different_signatures() {
        let key1 = HmacKey::new("a".repeat(32)).unwrap();
        let key2 = HmacKey::new("b".repeat(32)).unwrap();
        assert_ne!(key1.sign(b"data"), key2.sign(b"data"));
    }

    #[test]
    fn test_hash_token_deterministic() {
        let hash1 = hash_token("some-credential");
        let hash2 = hash_token("some-credential");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token("other-credential"));
    }
}
