//! Sentra Auth API
//!
//! Authentication service: login issues a signed access/refresh credential
//! pair, refresh rotates it, logout revokes it. All routes except the
//! allow-listed ones sit behind the edge enforcement filter.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use sentra_auth_core::{
    hash_password, AuthError, AuthService, DirectoryRecord, InMemoryDirectory,
    MemoryRevocationStore, MemorySessionCache,
};
use sentra_axum::{EdgeConfig, EdgeLayer, RevocationPolicy};
use sentra_types::{Identity, IdentityId, TenantId};

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::Config;
pub use state::AppState;

/// Paths reachable without a credential
const ALLOW_PATHS: [&str; 4] = ["/api/auth/login", "/api/auth/refresh", "/health", "/ready"];

/// Build the application state, seeding the demo admin identity.
///
/// The in-memory directory stands in for persistent user storage, which
/// is out of scope here.
pub fn build_state(config: Config) -> Result<AppState, AuthError> {
    let directory = InMemoryDirectory::new();

    let admin = Identity::new(IdentityId(1), "admin", TenantId(1))
        .with_role("ADMIN")
        .with_permission("system:user:list")
        .with_permission("system:user:add")
        .with_permission("system:role:list");
    directory.insert(
        "admin",
        DirectoryRecord {
            identity: admin,
            password_hash: hash_password(&config.admin_password)?,
        },
    );

    let revocations = Arc::new(MemoryRevocationStore::new());
    let sessions = Arc::new(MemorySessionCache::new());

    let auth = AuthService::new(
        config.auth.clone(),
        Arc::new(directory),
        Arc::clone(&revocations),
        sessions,
    )?;

    Ok(AppState::new(auth, revocations, config))
}

/// Build the router with the edge filter applied
pub fn app(state: AppState) -> Router {
    let policy = if state.config.store_checked_edge {
        let store: Arc<dyn sentra_auth_core::RevocationStore> = state.revocations.clone();
        RevocationPolicy::StoreChecked(store)
    } else {
        RevocationPolicy::CacheOnly
    };
    let edge_config = EdgeConfig::new(ALLOW_PATHS).with_policy(policy);
    let edge = EdgeLayer::new(state.auth.codec().clone(), edge_config);

    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/refresh", post(handlers::refresh))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::me))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .layer(edge)
        .with_state(state)
}
