//! Credential codec
//!
//! Wire form is `base64url(json claims).base64url(hmac-sha256 signature)`.
//! The signature is verified before the payload is parsed; a holder of the
//! shared secret verifies credentials with no store round trip.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::claims::Claims;
use crate::crypto::{constant_time_eq, HmacKey};
use crate::error::AuthError;

/// Stateless encoder/decoder for signed credentials.
#[derive(Clone)]
pub struct TokenCodec {
    key: HmacKey,
}

impl TokenCodec {
    pub fn new(key: HmacKey) -> Self {
        Self { key }
    }

    /// Encode claims into a signed credential string.
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        let payload_json = serde_json::to_vec(claims).map_err(|e| {
            tracing::error!("failed to serialize claims: {}", e);
            AuthError::InvalidToken
        })?;

        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature = self.compute_signature(&payload_b64);

        Ok(format!("{payload_b64}.{signature}"))
    }

    /// Decode and signature-verify a credential string.
    ///
    /// Malformed structure and signature mismatch both fail with
    /// [`AuthError::InvalidSignature`]; the caller learns nothing about
    /// which check failed. Expiry is not checked here.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        // Split signature from payload on the last dot
        let Some((payload_b64, signature)) = token.rsplit_once('.') else {
            return Err(AuthError::InvalidSignature);
        };

        let expected_sig = self.compute_signature(payload_b64);
        if !constant_time_eq(signature.as_bytes(), expected_sig.as_bytes()) {
            tracing::debug!("credential signature mismatch");
            return Err(AuthError::InvalidSignature);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::InvalidSignature)?;

        serde_json::from_slice(&payload_json).map_err(|_| AuthError::InvalidSignature)
    }

    /// Base64url-encoded HMAC-SHA256 over the encoded payload
    fn compute_signature(&self, payload_b64: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.key.sign(payload_b64.as_bytes()))
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
