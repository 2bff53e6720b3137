//! Shared test fixtures: seeded directory, stores, service construction

use std::sync::Arc;
use std::time::Duration;

use sentra_auth_core::{
    hash_password, AuthConfig, AuthService, DirectoryRecord, InMemoryDirectory,
    MemoryRevocationStore, MemorySessionCache,
};
use sentra_types::{Identity, IdentityId, TenantId};

pub type TestAuthService =
    AuthService<InMemoryDirectory, MemoryRevocationStore, MemorySessionCache>;

pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret!";

/// An admin identity matching the canonical seed data
pub fn admin_identity() -> Identity {
    Identity::new(IdentityId(1), "admin", TenantId(1))
        .with_role("ADMIN")
        .with_permission("system:user:list")
        .with_permission("system:user:add")
        .with_permission("system:role:list")
}

/// Directory seeded with the admin user (password `admin123`)
pub fn seeded_directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    directory.insert(
        "admin",
        DirectoryRecord {
            identity: admin_identity(),
            password_hash: hash_password("admin123").expect("hashing test password"),
        },
    );
    directory
}

pub struct TestHarness {
    pub service: TestAuthService,
    pub directory: InMemoryDirectory,
    pub revocations: Arc<MemoryRevocationStore>,
}

/// Build a service over in-memory collaborators with default validity
pub fn harness() -> TestHarness {
    harness_with_config(AuthConfig::new(TEST_SECRET))
}

/// Build a service with custom validity windows (short TTLs for expiry tests)
pub fn harness_with_config(config: AuthConfig) -> TestHarness {
    let directory = seeded_directory();
    let revocations = Arc::new(MemoryRevocationStore::new());
    let service = AuthService::new(
        config,
        Arc::new(directory.clone()),
        Arc::clone(&revocations),
        Arc::new(MemorySessionCache::new()),
    )
    .expect("test secret is long enough");

    TestHarness {
        service,
        directory,
        revocations,
    }
}

/// Config with an access validity short enough to expire inside a test
pub fn short_lived_config(access: Duration) -> AuthConfig {
    AuthConfig::new(TEST_SECRET).with_access_validity(access)
}
