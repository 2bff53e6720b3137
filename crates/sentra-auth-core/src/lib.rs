//! Sentra Auth Core - Credential lifecycle business logic
//!
//! Core authentication functionality: the signed-credential codec, the
//! access/refresh issuer, the session lifecycle service
//! (login/refresh/logout), and the blacklist-style revocation store.
//!
//! Credentials are self-contained: any holder of the shared secret verifies
//! them locally, without a store lookup. Revocation before natural expiry
//! goes through the [`RevocationStore`], written exclusively by the
//! [`AuthService`] on logout.

pub mod claims;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod directory;
pub mod error;
pub mod issuer;
pub mod service;
pub mod store;

pub use claims::{AccessClaims, Claims, RefreshClaims, TokenKind};
pub use codec::TokenCodec;
pub use config::AuthConfig;
pub use crypto::{constant_time_eq, hash_token, HmacKey, HmacKeyError};
pub use directory::{
    hash_password, verify_password, Directory, DirectoryError, DirectoryRecord, InMemoryDirectory,
};
pub use error::AuthError;
pub use issuer::TokenIssuer;
pub use service::{AuthService, LoginOutcome, LoginRequest};
pub use store::{
    MemoryRevocationStore, MemorySessionCache, RevocationStore, SessionCache, StoreError,
};
