//! Auth service - session lifecycle orchestration
//!
//! Ties together the directory, the issuer/codec, the revocation store and
//! the session cache. A session moves Anonymous -> Authenticated -> Revoked;
//! there are no other states.
//!
//! Failure policy: no retries anywhere. Store round trips carry an explicit
//! timeout and surface `RevocationStoreUnavailable` on failure; treating
//! "store unreachable" as "not revoked" would defeat the revocation
//! guarantee.

use std::future::Future;
use std::sync::Arc;

use sentra_types::Identity;

use crate::claims::Claims;
use crate::codec::TokenCodec;
use crate::config::AuthConfig;
use crate::crypto::{hash_token, HmacKey};
use crate::directory::{verify_password, Directory};
use crate::error::AuthError;
use crate::issuer::TokenIssuer;
use crate::store::{RevocationStore, SessionCache, StoreError};

/// Login input
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Captcha answer; verification is an upstream concern
    pub captcha: Option<String>,
    pub captcha_id: Option<String>,
    /// Widens the session-cache window only, never credential validity
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            captcha: None,
            captcha_id: None,
            remember_me: false,
        }
    }
}

/// Successful login or refresh result
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    /// Access credential validity in seconds
    pub expires_in: u64,
    /// The identity the credentials were issued for, including the freshly
    /// resolved role/permission sets
    pub identity: Identity,
}

/// Authentication service
///
/// Exclusive owner of revocation-store and session-cache writes. Generic
/// over its collaborators so tests and deployments choose their own
/// directory and stores.
pub struct AuthService<D, R, S> {
    directory: Arc<D>,
    revocations: Arc<R>,
    sessions: Arc<S>,
    codec: TokenCodec,
    issuer: TokenIssuer,
    config: AuthConfig,
}

impl<D: Directory, R: RevocationStore, S: SessionCache> AuthService<D, R, S> {
    /// Create the service; fails if the configured secret is too short.
    pub fn new(
        config: AuthConfig,
        directory: Arc<D>,
        revocations: Arc<R>,
        sessions: Arc<S>,
    ) -> Result<Self, AuthError> {
        let key = HmacKey::new(&config.secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let codec = TokenCodec::new(key);
        let issuer = TokenIssuer::new(
            codec.clone(),
            &config.issuer,
            config.access_validity,
            config.refresh_validity,
        );

        Ok(Self {
            directory,
            revocations,
            sessions,
            codec,
            issuer,
            config,
        })
    }

    /// The codec sharing this service's secret, for edge verification
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Resolve the identity, verify the password, issue a credential pair.
    ///
    /// Prior revocation entries for this identity are irrelevant to a fresh
    /// login; only the session cache is touched.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, AuthError> {
        let record = self
            .directory
            .find_by_username(&request.username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::IdentityNotFound)?;

        if !verify_password(&request.password, &record.password_hash) {
            tracing::debug!(username = %request.username, "password verification failed");
            return Err(AuthError::InvalidCredential);
        }

        let outcome = self
            .issue_and_cache(&record.identity, request.remember_me)
            .await?;
        tracing::info!(identity_id = %record.identity.id, "login succeeded");
        Ok(outcome)
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Exchange a refresh credential for a fresh pair.
    ///
    /// Re-resolves the identity rather than reusing the old claims, so role
    /// changes since the original issuance take effect here. The old
    /// refresh credential is not revoked and stays usable until its natural
    /// expiry.
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginOutcome, AuthError> {
        let claims = self.codec.decode(refresh_token)?;
        let Claims::Refresh(_) = &claims else {
            tracing::debug!("refresh called with a non-refresh credential");
            return Err(AuthError::InvalidToken);
        };
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        let identity = self
            .directory
            .find_by_id(claims.identity_id())
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::IdentityNotFound)?;

        let outcome = self.issue_and_cache(&identity, false).await?;
        tracing::info!(identity_id = %identity.id, "credentials refreshed");
        Ok(outcome)
    }

    // =========================================================================
    // Logout / revocation
    // =========================================================================

    /// Revoke an access credential until its natural expiry.
    ///
    /// Idempotent: an invalid, expired or already-revoked credential is a
    /// no-op success. Store unavailability is surfaced, never swallowed:
    /// "logout succeeded" must imply "revoked or already expired".
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let Ok(claims @ Claims::Access(_)) = self.codec.decode(access_token) else {
            return Ok(());
        };
        let Some(remaining) = claims.remaining_validity() else {
            // Already expired; natural expiry did the work
            return Ok(());
        };

        let key = hash_token(access_token);
        self.store_call(self.revocations.put(&key, remaining)).await?;
        self.store_call(self.sessions.remove(claims.identity_id()))
            .await?;

        tracing::info!(identity_id = %claims.identity_id(), "logout succeeded");
        Ok(())
    }

    /// Existence check against the revocation store.
    pub async fn is_revoked(&self, access_token: &str) -> Result<bool, AuthError> {
        self.store_call(self.revocations.contains(&hash_token(access_token)))
            .await
    }

    /// Latest cached access credential for an identity (bookkeeping view)
    pub async fn cached_session(
        &self,
        identity_id: sentra_types::IdentityId,
    ) -> Result<Option<String>, AuthError> {
        self.store_call(self.sessions.get(identity_id)).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn issue_and_cache(
        &self,
        identity: &Identity,
        remember_me: bool,
    ) -> Result<LoginOutcome, AuthError> {
        let access_token = self.issuer.issue_access(identity)?;
        let refresh_token = self.issuer.issue_refresh(identity)?;

        let session_ttl = if remember_me {
            self.config.remember_me_session_ttl
        } else {
            self.config.session_ttl
        };
        self.store_call(self.sessions.put(identity.id, &access_token, session_ttl))
            .await?;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            expires_in: self.issuer.access_validity_secs(),
            identity: identity.clone(),
        })
    }

    /// One store round trip: explicit timeout, no retries.
    async fn store_call<T, F>(&self, fut: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!("store call failed: {}", e);
                Err(AuthError::RevocationStoreUnavailable)
            }
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.config.store_timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(AuthError::RevocationStoreUnavailable)
            }
        }
    }
}

impl<D, R, S> std::fmt::Debug for AuthService<D, R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
