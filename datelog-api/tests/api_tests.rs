//! End-to-end tests for the authentication boundary.
//!
//! Drives the real router in-process: register → login → protected route,
//! plus the header and token failure modes a client can actually hit.

use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use axum::body::to_bytes;
use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use chrono::Utc;
use datelog_api::domain::user::service::UserService;
use datelog_api::inbound::http::router::create_router;
use datelog_api::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

fn test_app() -> (Router, Arc<Authenticator>) {
    let authenticator = Arc::new(Authenticator::new(SECRET));
    let repository = Arc::new(InMemoryUserRepository::new());
    let user_service = Arc::new(UserService::new(repository, Arc::clone(&authenticator)));
    let router = create_router(user_service, Arc::clone(&authenticator));
    (router, authenticator)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is not JSON")
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_me(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/api/me");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn register(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/api/auth/register",
            json!({
                "email": email,
                "display_name": "Alice",
                "password": password,
            }),
        ),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ),
    )
    .await
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().expect("missing error code")
}

#[tokio::test]
async fn test_register_login_and_access_protected_route() {
    let (app, _) = test_app();

    let (status, user) = register(&app, "alice@example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_str().expect("missing user id").to_string();
    assert!(user.get("password_hash").is_none());

    let (status, body) = login(&app, "alice@example.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("missing token");

    let (status, me) = send(&app, get_me(Some(&format!("Bearer {token}")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user_id"], json!(user_id));
    assert_eq!(me["couple_id"], Value::Null);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (app, _) = test_app();

    register(&app, "alice@example.com", "password123").await;

    let (status, body) = login(&app, "alice@example.com", "wrong_password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_with_unknown_email_is_unauthorized() {
    let (app, _) = test_app();

    let (status, body) = login(&app, "nobody@example.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (app, _) = test_app();

    let (status, _) = register(&app, "alice@example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "alice@example.com", "password123").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn test_lowercase_bearer_with_extra_whitespace_is_accepted() {
    let (app, authenticator) = test_app();

    let claims = Claims::for_user("u1", Some("c1".to_string()));
    let token = authenticator.generate_token(&claims).unwrap();

    let (status, me) = send(&app, get_me(Some(&format!("bearer   {token}")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user_id"], json!("u1"));
    assert_eq!(me["couple_id"], json!("c1"));
}

#[tokio::test]
async fn test_wrong_scheme_is_unauthorized() {
    let (app, authenticator) = test_app();

    let token = authenticator
        .generate_token(&Claims::for_user("u1", None))
        .unwrap();

    let (status, body) = send(&app, get_me(Some(&format!("Basic {token}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_glued_scheme_is_unauthorized() {
    let (app, authenticator) = test_app();

    let token = authenticator
        .generate_token(&Claims::for_user("u1", None))
        .unwrap();

    let (status, body) = send(&app, get_me(Some(&format!("Bearer{token}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_missing_and_empty_headers_are_unauthorized() {
    let (app, _) = test_app();

    let (status, body) = send(&app, get_me(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let (status, body) = send(&app, get_me(Some(""))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_expired_token_reports_token_expired() {
    let (app, authenticator) = test_app();

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "u1".to_string(),
        couple_id: None,
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = authenticator.generate_token(&claims).unwrap();

    let (status, body) = send(&app, get_me(Some(&format!("Bearer {token}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let (app, authenticator) = test_app();

    let token = authenticator
        .generate_token(&Claims::for_user("u1", None))
        .unwrap();

    let dot = token.rfind('.').unwrap();
    let (head, signature) = token.split_at(dot + 1);
    let replacement = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{head}{replacement}{}", &signature[1..]);

    let (status, body) = send(&app, get_me(Some(&format!("Bearer {tampered}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let (app, _) = test_app();

    let other = Authenticator::new(b"another_secret_at_least_32_bytes!!");
    let token = other
        .generate_token(&Claims::for_user("u1", None))
        .unwrap();

    let (status, body) = send(&app, get_me(Some(&format!("Bearer {token}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
}
