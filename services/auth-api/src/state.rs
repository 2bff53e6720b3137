//! Application state

use std::sync::Arc;

use sentra_auth_core::{
    AuthService, InMemoryDirectory, MemoryRevocationStore, MemorySessionCache,
};

use crate::config::Config;

/// Type alias for the auth service with this deployment's collaborators
pub type AuthServiceImpl =
    AuthService<InMemoryDirectory, MemoryRevocationStore, MemorySessionCache>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for credential issuance and revocation
    pub auth: Arc<AuthServiceImpl>,
    /// The revocation store the edge filter may probe
    pub revocations: Arc<MemoryRevocationStore>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        auth: AuthServiceImpl,
        revocations: Arc<MemoryRevocationStore>,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            revocations,
            config: Arc::new(config),
        }
    }
}
