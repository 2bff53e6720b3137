//! Authentication handlers (login, logout, refresh, me)

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use sentra_auth_core::{AuthError, LoginOutcome};
use sentra_axum::{CurrentIdentity, BEARER_PREFIX};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Captcha answer (accepted, not verified; no captcha provider wired)
    #[serde(default)]
    pub captcha: Option<String>,
    #[serde(default)]
    pub captcha_id: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access credential validity in seconds
    pub expires_in: u64,
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<LoginOutcome> for TokenResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.access_token,
            refresh_token: outcome.refresh_token,
            token_type: "Bearer",
            expires_in: outcome.expires_in,
            user_id: outcome.identity.id.0,
            username: outcome.identity.display_name.clone(),
            roles: outcome.identity.roles.iter().cloned().collect(),
            permissions: outcome.identity.permissions.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i64,
    pub username: String,
    pub tenant_id: i64,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
///
/// Verify the password and issue an access/refresh credential pair
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    let mut login = sentra_auth_core::LoginRequest::new(&req.username, &req.password);
    login.captcha = req.captcha;
    login.captcha_id = req.captcha_id;
    login.remember_me = req.remember_me;

    let outcome = state.auth.login(&login).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh credential for a fresh pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if req.refresh_token.is_empty() {
        return Err(ApiError::BadRequest(
            "refreshToken is required".to_string(),
        ));
    }

    let outcome = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/auth/logout
///
/// Revoke the presented access credential and clear the cached session.
///
/// Succeeds for invalid or expired credentials too; only a store outage
/// surfaces as an error.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<LogoutResponse>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or(ApiError::Auth(AuthError::Unauthenticated))?;

    state.auth.logout(token).await?;

    Ok(Json(LogoutResponse { success: true }))
}

/// GET /api/auth/me
///
/// Identity summary from the verified request context
pub async fn me(identity: CurrentIdentity) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: identity.identity_id.0,
        username: identity.display_name.clone(),
        tenant_id: identity.tenant_id.0,
        roles: identity.roles.iter().cloned().collect(),
        permissions: identity.permissions.iter().cloned().collect(),
    })
}
