//! Sentra Axum Integration
//!
//! The edge enforcement filter and identity-context plumbing for axum
//! services.
//!
//! # Overview
//!
//! - [`EdgeLayer`] - tower middleware verifying the bearer credential on
//!   every non-allow-listed request, locally, with no store round trip
//!   (unless configured for store-checked revocation)
//! - [`AuthContext`] - verified identity attributes for the current request
//! - [`CurrentIdentity`] / [`MaybeIdentity`] - extractors over the context
//!   placed by the filter
//! - [`ForwardedIdentity`] - extractor for downstream services reading the
//!   headers the filter injects
//!
//! # Quick Start
//!
//! ```ignore
//! use sentra_axum::{CurrentIdentity, EdgeConfig, EdgeLayer};
//! use axum::{routing::get, Router};
//!
//! async fn whoami(identity: CurrentIdentity) -> String {
//!     format!("hello, {}", identity.display_name)
//! }
//!
//! let config = EdgeConfig::new(["/api/auth/login", "/health"]);
//! let app = Router::new()
//!     .route("/api/me", get(whoami))
//!     .layer(EdgeLayer::new(codec, config));
//! ```

pub mod context;
pub mod extractors;
pub mod layer;
pub mod path;

pub use context::AuthContext;
pub use extractors::{CurrentIdentity, ForwardedIdentity, MaybeIdentity, UnauthenticatedRejection};
pub use layer::{EdgeConfig, EdgeLayer, EdgeService, RevocationPolicy};
pub use path::PathMatcher;

/// Header carrying the verified identity id
pub const HEADER_USER_ID: &str = "x-user-id";
/// Header carrying the verified display name
pub const HEADER_USERNAME: &str = "x-username";
/// Header carrying the verified tenant id
pub const HEADER_TENANT_ID: &str = "x-tenant-id";
/// Bearer scheme prefix in the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";
