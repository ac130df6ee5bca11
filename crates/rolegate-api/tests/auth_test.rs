//! Integration tests for the auth endpoints.

mod helpers;

use axum::http::{StatusCode, header};
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_register_returns_user_and_tokens() {
    let app = TestApp::new().await;
    let body = app.register("alice", "password123").await;

    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["roles"], json!(["viewer"]));
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["tokens"]["token_type"], "bearer");
    assert!(body["tokens"]["access_token"].is_string());
    assert!(body["tokens"]["refresh_token"].is_string());
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "username": "al",
                "email": "not-an-email",
                "password": "short",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = TestApp::new().await;
    app.register("bob", "password123").await;

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "username": "bob",
                "email": "bob2@example.com",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Username or email already exists.");
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let app = TestApp::new().await;
    app.register("carol", "password123").await;

    let ok = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "username": "carol", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(ok.body["tokens"]["access_token"].is_string());

    let bad = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "username": "carol", "password": "wrongpassword" })),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["error"], "INVALID_CREDENTIALS");
    assert_eq!(bad.body["message"], "Invalid username or password.");
    assert_eq!(bad.headers[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn test_login_disabled_account() {
    let app = TestApp::new().await;
    let body = app.register("dave", "password123").await;
    let id = body["user"]["id"].as_i64().unwrap();
    app.set_active(id, false).await;

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "username": "dave", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "ACCOUNT_DISABLED");
    assert_eq!(response.body["message"], "Account is disabled.");
}

#[tokio::test]
async fn test_refresh_rotation_and_logout() {
    let app = TestApp::new().await;
    let body = app.register("erin", "password123").await;
    let first = body["tokens"]["refresh_token"].as_str().unwrap().to_string();

    let rotated = app
        .request("POST", "/auth/refresh", Some(json!({ "refresh_token": first })), None)
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_eq!(rotated.body["token_type"], "bearer");
    let second = rotated.body["refresh_token"].as_str().unwrap().to_string();

    let replay = app
        .request("POST", "/auth/refresh", Some(json!({ "refresh_token": first })), None)
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.body["error"], "INVALID_TOKEN");

    let logout = app
        .request("POST", "/auth/logout", Some(json!({ "refresh_token": second })), None)
        .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);

    let after = app
        .request("POST", "/auth/refresh", Some(json!({ "refresh_token": second })), None)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_outage_maps_to_503() {
    let app = TestApp::new().await;
    app.store.set_unavailable(true);

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "username": "frank", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "SERVICE_UNAVAILABLE");
}
