//! End-to-end login/refresh/logout flows over the full router

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use sentra_auth_api::{app, build_state, AppState, Config};
use sentra_auth_core::AuthConfig;

const SECRET: &str = "auth-api-test-secret-0123456789abcdef!!";

fn test_config(store_checked: bool) -> Config {
    Config {
        http_port: 0,
        auth: AuthConfig::new(SECRET).with_store_timeout(Duration::from_secs(1)),
        store_checked_edge: store_checked,
        admin_password: "admin123".to_string(),
    }
}

fn test_state(store_checked: bool) -> AppState {
    build_state(test_config(store_checked)).unwrap()
}

fn test_app(store_checked: bool) -> Router {
    app(test_state(store_checked))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer(uri: &str, method: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(router: &Router) -> Value {
    let response = router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({"username": "admin", "password": "admin123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn test_login_issues_credential_pair() {
    let router = test_app(false);
    let body = login(&router).await;

    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 86_400);
    assert_eq!(body["userId"], 1);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["roles"], json!(["ADMIN"]));
    assert!(body["accessToken"].as_str().unwrap().contains('.'));
    assert!(body["refreshToken"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let router = test_app(false);
    let response = router
        .oneshot(post_json(
            "/api/auth/login",
            json!({"username": "admin", "password": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIAL");
    assert_eq!(body["error"]["domainCode"], 1002);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let router = test_app(false);
    let response = router
        .oneshot(post_json(
            "/api/auth/login",
            json!({"username": "ghost", "password": "admin123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"]["domainCode"], 1001);
}

#[tokio::test]
async fn test_login_missing_fields_bad_request() {
    let router = test_app(false);
    let response = router
        .oneshot(post_json(
            "/api/auth/login",
            json!({"username": "", "password": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_returns_identity_summary() {
    let router = test_app(false);
    let body = login(&router).await;
    let token = body["accessToken"].as_str().unwrap();

    let response = router
        .oneshot(bearer("/api/auth/me", "GET", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me = json_body(response).await;
    assert_eq!(me["userId"], 1);
    assert_eq!(me["username"], "admin");
    assert_eq!(me["tenantId"], 1);
    assert_eq!(me["roles"], json!(["ADMIN"]));
}

#[tokio::test]
async fn test_me_requires_credential() {
    let router = test_app(false);
    let response = router
        .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let router = test_app(false);
    let body = login(&router).await;
    let refresh_token = body["refreshToken"].as_str().unwrap();

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/auth/refresh",
            json!({"refreshToken": refresh_token}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rotated = json_body(response).await;
    let new_access = rotated["accessToken"].as_str().unwrap();
    assert_eq!(rotated["username"], "admin");

    // The rotated access credential works
    let response = router
        .oneshot(bearer("/api/auth/me", "GET", new_access))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_credential() {
    let router = test_app(false);
    let body = login(&router).await;
    let access_token = body["accessToken"].as_str().unwrap();

    let response = router
        .oneshot(post_json(
            "/api/auth/refresh",
            json!({"refreshToken": access_token}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let err = json_body(response).await;
    assert_eq!(err["error"]["domainCode"], 1006);
}

#[tokio::test]
async fn test_refresh_rejects_garbage() {
    let router = test_app(false);
    let response = router
        .oneshot(post_json(
            "/api/auth/refresh",
            json!({"refreshToken": "junk.junk"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_succeeds_and_is_idempotent() {
    let router = test_app(false);
    let body = login(&router).await;
    let token = body["accessToken"].as_str().unwrap();

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(bearer("/api/auth/logout", "POST", token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["success"], true);
    }
}

#[tokio::test]
async fn test_logout_without_credential_rejected_at_edge() {
    let router = test_app(false);
    let response = router
        .oneshot(
            Request::post("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_checked_edge_rejects_after_logout() {
    // With the store-checked policy the logged-out credential dies
    // immediately; cache-only keeps it alive until expiry.
    let router = test_app(true);
    let body = login(&router).await;
    let token = body["accessToken"].as_str().unwrap();

    let response = router
        .clone()
        .oneshot(bearer("/api/auth/me", "GET", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(bearer("/api/auth/logout", "POST", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(bearer("/api/auth/me", "GET", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cache_only_edge_accepts_after_logout() {
    let router = test_app(false);
    let body = login(&router).await;
    let token = body["accessToken"].as_str().unwrap();

    let response = router
        .clone()
        .oneshot(bearer("/api/auth/logout", "POST", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Bounded staleness: local verification still passes
    let response = router
        .oneshot(bearer("/api/auth/me", "GET", token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_ready() {
    let router = test_app(false);

    let response = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");

    let response = router
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ready");
}
