//! Integration tests for the authentication flow.

use axum::http::StatusCode;
use serde_json::json;

use pos_auth::UserDirectory;
use pos_core::types::TenantId;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_returns_created_user_without_secret() {
    let app = TestApp::new().await;
    let response = app.register("alice").await;

    assert_eq!(response.status, StatusCode::CREATED);
    let user = &response.body["data"];
    assert_eq!(user["username"], "alice");
    assert_eq!(user["tenant_id"], 1);
    assert_eq!(user["role"]["name"], "cashier");
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = TestApp::new().await;
    assert_eq!(app.register("alice").await.status, StatusCode::CREATED);

    let response = app.register("ALICE").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_same_username_in_other_tenant_is_allowed() {
    let app = TestApp::new().await;
    assert_eq!(app.register_in(1, "alice").await.status, StatusCode::CREATED);
    assert_eq!(app.register_in(2, "alice").await.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_weak_password_is_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "tenant_id": 1,
                "username": "bob",
                "email": "bob@example.com",
                "password": "short",
                "full_name": "Bob",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_by_username_and_email() {
    let app = TestApp::new().await;
    app.register("alice").await;

    for label in ["alice", "alice@example.com"] {
        let response = app.login(1, label, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{label}");
        let data = &response.body["data"];
        assert_eq!(data["token_type"], "Bearer");
        assert_eq!(data["expires_in"], 86_400);
        assert!(data["access_token"].as_str().is_some());
        assert!(data["user"]["last_login_at"].is_string());
    }
    assert_eq!(app.sessions.len(), 2);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.register("alice").await;

    let wrong_password = app.login(1, "alice", "Wrong12345").await;
    let unknown_user = app.login(1, "mallory", PASSWORD).await;
    let other_tenant = app.login(2, "alice", PASSWORD).await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_user.status);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(wrong_password.body, other_tenant.body);
    assert!(app.sessions.is_empty());
}

#[tokio::test]
async fn test_inactive_user_cannot_log_in() {
    let app = TestApp::new().await;
    app.register("alice").await;

    let mut user = app
        .directory
        .find_by_identity_label(TenantId::new(1), "alice")
        .await
        .unwrap()
        .unwrap();
    user.is_active = false;
    app.directory.update(&user).await.unwrap();

    let inactive = app.login(1, "alice", PASSWORD).await;
    let wrong = app.login(1, "alice", "Wrong12345").await;
    assert_eq!(inactive.status, StatusCode::UNAUTHORIZED);
    assert_eq!(inactive.body, wrong.body);
}

#[tokio::test]
async fn test_me_requires_valid_access_token() {
    let app = TestApp::new().await;
    let (access, refresh) = app.signed_in("alice").await;

    let me = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "alice");
    assert_eq!(me.body["data"]["role"]["name"], "cashier");

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not-a-token"))
        .await;
    let wrong_kind = app
        .request("GET", "/api/auth/me", None, Some(&refresh))
        .await;
    for response in [&missing, &garbage, &wrong_kind] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid or expired token");
    }
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::new().await;
    let (access, refresh) = app.signed_in("alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let new_access = response.body["data"]["access_token"].as_str().unwrap();

    let me = app.request("GET", "/api/auth/me", None, Some(new_access)).await;
    assert_eq!(me.status, StatusCode::OK);

    let with_access = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": access })),
            None,
        )
        .await;
    assert_eq!(with_access.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_every_session() {
    let app = TestApp::new().await;
    let (access, refresh) = app.signed_in("alice").await;
    app.login(1, "alice", PASSWORD).await;
    assert_eq!(app.sessions.len(), 2);

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["sessions_revoked"], 2);
    assert!(app.sessions.is_empty());

    let me = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_rotates_credentials() {
    let app = TestApp::new().await;
    let (access, _) = app.signed_in("alice").await;

    let wrong_old = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "old_password": "Wrong12345", "new_password": "Fresh5678" })),
            Some(&access),
        )
        .await;
    assert_eq!(wrong_old.status, StatusCode::UNAUTHORIZED);

    let changed = app
        .request(
            "POST",
            "/api/auth/change-password",
            Some(json!({ "old_password": PASSWORD, "new_password": "Fresh5678" })),
            Some(&access),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(changed.body["data"]["sessions_revoked"], 1);

    assert_eq!(
        app.login(1, "alice", PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login(1, "alice", "Fresh5678").await.status,
        StatusCode::OK
    );
    let stale = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_password_does_not_reveal_existence() {
    let mut app = TestApp::new().await;
    app.register("alice").await;
    app.drain_event_types();

    let known = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "tenant_id": 1, "email": "alice@example.com" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/reset-password",
            Some(json!({ "tenant_id": 1, "email": "nobody@example.com" })),
            None,
        )
        .await;

    assert_eq!(known.status, StatusCode::ACCEPTED);
    assert_eq!(known.status, unknown.status);
    assert_eq!(known.body, unknown.body);
    assert_eq!(app.drain_event_types(), vec!["password.reset_requested"]);
}

#[tokio::test]
async fn test_events_follow_the_flow() {
    let mut app = TestApp::new().await;
    let (access, _) = app.signed_in("alice").await;
    app.request("POST", "/api/auth/logout", None, Some(&access))
        .await;

    assert_eq!(
        app.drain_event_types(),
        vec!["user.registered", "user.logged_in", "user.logged_out"]
    );
}

#[tokio::test]
async fn test_verify_email_is_not_implemented() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "token": "abc" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "memory");
}

#[tokio::test]
async fn test_register_rejects_oversized_phone_and_email_like_username() {
    let app = TestApp::new().await;
    let long_phone = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "tenant_id": 1,
                "username": "carol",
                "email": "carol@example.com",
                "password": PASSWORD,
                "full_name": "Carol",
                "phone": "0".repeat(30),
            })),
            None,
        )
        .await;
    assert_eq!(long_phone.status, StatusCode::BAD_REQUEST);

    let at_username = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "tenant_id": 1,
                "username": "dave@example.com",
                "email": "dave.real@example.com",
                "password": PASSWORD,
                "full_name": "Dave",
            })),
            None,
        )
        .await;
    assert_eq!(at_username.status, StatusCode::BAD_REQUEST);
}
