//! Request extractors for the verified identity context
//!
//! [`CurrentIdentity`] is the usual accessor behind the edge filter: it
//! reads the [`AuthContext`] extension the filter attached and rejects
//! with 401 when none is present (route mounted outside the filter, or an
//! allow-listed path reached without a credential). [`MaybeIdentity`]
//! never rejects. [`ForwardedIdentity`] is for downstream services that
//! receive identity as headers from an upstream edge instead of a
//! credential.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sentra_types::{IdentityId, TenantId};

use crate::context::AuthContext;
use crate::{HEADER_TENANT_ID, HEADER_USERNAME, HEADER_USER_ID};

/// The verified identity of the current request.
///
/// Fails with 401 when no context is attached.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub AuthContext);

impl std::ops::Deref for CurrentIdentity {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for [`CurrentIdentity`] and [`ForwardedIdentity`]
#[derive(Debug)]
pub struct UnauthenticatedRejection;

impl IntoResponse for UnauthenticatedRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": "UNAUTHENTICATED",
                "message": "authentication required",
            }
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = UnauthenticatedRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(UnauthenticatedRejection)
    }
}

/// The identity context if one is attached; never rejects.
#[derive(Debug, Clone, Default)]
pub struct MaybeIdentity(pub Option<AuthContext>);

impl MaybeIdentity {
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.0.as_ref().is_some_and(|ctx| ctx.has_role(role))
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.as_ref().is_some_and(|ctx| ctx.has_permission(permission))
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<AuthContext>().cloned()))
    }
}

/// Identity attributes forwarded as headers by an upstream edge filter.
///
/// Trusts the headers as-is; only meaningful on services that are never
/// reachable except through the edge.
#[derive(Debug, Clone)]
pub struct ForwardedIdentity {
    pub identity_id: IdentityId,
    pub display_name: String,
    pub tenant_id: TenantId,
}

impl<S> FromRequestParts<S> for ForwardedIdentity
where
    S: Send + Sync,
{
    type Rejection = UnauthenticatedRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_i64 = |name: &str| -> Option<i64> {
            parts.headers.get(name)?.to_str().ok()?.parse().ok()
        };
        let identity_id = header_i64(HEADER_USER_ID).ok_or(UnauthenticatedRejection)?;
        let tenant_id = header_i64(HEADER_TENANT_ID).ok_or(UnauthenticatedRejection)?;
        let display_name = parts
            .headers
            .get(HEADER_USERNAME)
            .and_then(|v| v.to_str().ok())
            .ok_or(UnauthenticatedRejection)?
            .to_string();

        Ok(ForwardedIdentity {
            identity_id: IdentityId(identity_id),
            display_name,
            tenant_id: TenantId(tenant_id),
        })
    }
}
