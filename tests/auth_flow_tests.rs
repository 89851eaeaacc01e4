//! Registration, login and refresh token lifecycle over HTTP

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{test_app, tokens, TEST_BCRYPT_COST, TEST_SECRET};
use rmauth_server::auth::{AuthError, AuthService};
use rmauth_server::store::MemoryStore;

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn test_register_then_login_returns_tokens() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/registration/",
            None,
            json!({ "email": "alice@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password").is_none());

    let (status, body) = app
        .post(
            "/login/",
            None,
            json!({ "email": "alice@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["token_type"], "Bearer");

    let (access, refresh) = tokens(&body);
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = test_app();
    app.register("alice@example.com", "password123").await;

    let (wrong_status, wrong_body) = app
        .post(
            "/login/",
            None,
            json!({ "email": "alice@example.com", "password": "not-the-password" }),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .post(
            "/login/",
            None,
            json!({ "email": "bob@example.com", "password": "password123" }),
        )
        .await;
    let (missing_status, missing_body) = app
        .post("/login/", None, json!({ "email": "alice@example.com" }))
        .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body, missing_body);
    assert_eq!(wrong_body["error"]["code"], "VALIDATION_ERROR");
    assert!(wrong_body.get("access_token").is_none());
}

#[tokio::test]
async fn test_registration_validation() {
    let app = test_app();

    let (status, body) = app
        .post(
            "/registration/",
            None,
            json!({ "email": "alice@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .post(
            "/registration/",
            None,
            json!({ "email": "not-an-email", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/registration/", None, json!({ "password": "password123" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app();
    app.register("alice@example.com", "password123").await;

    let (status, body) = app
        .post(
            "/registration/",
            None,
            json!({ "email": "Alice@Example.com", "password": "password456" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

// ============================================================================
// Refresh token rotation
// ============================================================================

#[tokio::test]
async fn test_second_login_supersedes_first_refresh_token() {
    let app = test_app();
    app.register("alice@example.com", "password123").await;

    let (_, first_refresh) = app.login("alice@example.com", "password123").await;
    let (_, second_refresh) = app.login("alice@example.com", "password123").await;
    assert_ne!(first_refresh, second_refresh);

    let (status, body) = app
        .post("/refresh/", None, json!({ "refresh_token": first_refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("access_token").is_none());

    let (status, _) = app
        .post("/refresh/", None, json!({ "refresh_token": second_refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let app = test_app();
    let (_, refresh) = app.register("alice@example.com", "password123").await;

    let (status, body) = app
        .post("/refresh/", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (new_access, new_refresh) = tokens(&body);
    assert_ne!(new_refresh, refresh);

    // The submitted token is now superseded
    let (status, _) = app
        .post("/refresh/", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The fresh access token works on protected routes
    let (status, body) = app.get("/user/", Some(&new_access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");

    // And the fresh refresh token is exchangeable exactly once more
    let (status, _) = app
        .post("/refresh/", None, json!({ "refresh_token": new_refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_refresh_token_never_yields_tokens() {
    let app = test_app();
    app.register("alice@example.com", "password123").await;

    for candidate in ["", "deadbeef", &"0".repeat(64)] {
        let (status, body) = app
            .post("/refresh/", None, json!({ "refresh_token": candidate }))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(body.get("access_token").is_none());
        assert!(body.get("refresh_token").is_none());
    }
}

#[tokio::test]
async fn test_missing_or_malformed_refresh_token_is_unauthorized() {
    let app = test_app();
    app.register("alice@example.com", "password123").await;

    for body in [
        json!({}),
        json!({ "refresh_token": null }),
        json!({ "refresh_token": 12345 }),
        json!({ "refresh_token": ["token"] }),
    ] {
        let (status, response) = app.post("/refresh/", None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "body {}", body);
        assert_eq!(response["error"]["code"], "UNAUTHORIZED");
        assert!(response.get("access_token").is_none());
    }
}

#[tokio::test]
async fn test_concurrent_refresh_with_same_token_succeeds_once() {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(AuthService::new(
        store,
        TEST_SECRET.to_string(),
        900,
        TEST_BCRYPT_COST,
    ));
    let registered = auth
        .register("alice@example.com", "password123")
        .await
        .unwrap();

    let a = {
        let auth = auth.clone();
        let token = registered.refresh_token.clone();
        tokio::spawn(async move { auth.refresh_tokens(&token).await })
    };
    let b = {
        let auth = auth.clone();
        let token = registered.refresh_token.clone();
        tokio::spawn(async move { auth.refresh_tokens(&token).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AuthError::InvalidRefreshToken))));
}

// ============================================================================
// Account endpoints
// ============================================================================

#[tokio::test]
async fn test_user_endpoint_requires_bearer_token() {
    let app = test_app();

    let (status, body) = app.get("/user/", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    let (status, body) = app.get("/user/", Some("garbage.token.value")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = test_app();
    let (_, refresh) = app.register("alice@example.com", "password123").await;

    let (status, _) = app.get("/user/", Some(&refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_password_then_login() {
    let app = test_app();
    let (access, refresh) = app.register("alice@example.com", "password123").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/user/",
            Some(&access),
            Some(json!({ "password": "new-password-456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["is_staff"], false);

    let (status, _) = app
        .post(
            "/login/",
            None,
            json!({ "email": "alice@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The refresh token issued before the change no longer works
    let (status, _) = app
        .post("/refresh/", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.login("alice@example.com", "new-password-456").await;
}

#[tokio::test]
async fn test_update_email_to_taken_address_conflicts() {
    let app = test_app();
    app.register("alice@example.com", "password123").await;
    let (bob, _) = app.register("bob@example.com", "password123").await;

    let (status, _) = app
        .request(
            Method::PUT,
            "/user/",
            Some(&bob),
            Some(json!({ "email": "alice@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_deleted_user_loses_access_and_records() {
    let app = test_app();
    let (access, refresh) = app.register("alice@example.com", "password123").await;
    let user_id = app.user_id(&access).await;

    app.post("/createprofile/", Some(&access), json!({ "name": "Alice" }))
        .await;
    app.post(
        "/createrequisites/",
        Some(&access),
        common::requisites_body(),
    )
    .await;

    let (status, _) = app
        .request(Method::DELETE, "/user/", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get("/user/", Some(&access)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "USER_NOT_FOUND");

    let (status, _) = app.get(&format!("/profile/{}/", user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/refresh/", None, json!({ "refresh_token": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_store() {
    let app = test_app();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}
