//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use rmauth_server::app::build_router;
use rmauth_server::state::AppState;
use rmauth_server::store::MemoryStore;

pub const TEST_SECRET: &str = "test-secret-key";
/// Lowest cost bcrypt accepts; keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), TEST_SECRET.to_string(), 900, TEST_BCRYPT_COST);
    TestApp {
        router: build_router(state),
        store,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// Register an account and return (access_token, refresh_token)
    pub async fn register(&self, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/registration/",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
        tokens(&body)
    }

    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .post("/login/", None, json!({ "email": email, "password": password }))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        tokens(&body)
    }

    pub async fn user_id(&self, access_token: &str) -> Uuid {
        let (status, body) = self.get("/user/", Some(access_token)).await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Register a user with a profile carrying the given role.
    /// Returns (access_token, user_id).
    pub async fn user_with_role(&self, email: &str, role: &str) -> (String, Uuid) {
        let (token, _) = self.register(email, "password123").await;
        let user_id = self.user_id(&token).await;

        let (status, _) = self
            .post("/createprofile/", Some(&token), json!({ "name": email }))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        if role != "Nothing" {
            let (staff_token, _) = self
                .register(&format!("staff-{}", email), "password123")
                .await;
            let staff_id = self.user_id(&staff_token).await;
            assert!(self.store.set_staff(staff_id, true).await);

            let (status, body) = self
                .post(
                    &format!("/profile/{}/role/", user_id),
                    Some(&staff_token),
                    json!({ "role": role }),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "role assignment failed: {}", body);
        }

        (token, user_id)
    }
}

pub fn tokens(body: &Value) -> (String, String) {
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

pub fn requisites_body() -> Value {
    json!({
        "inn": "7707083893",
        "payment": "40702810900000000001",
        "bank_name": "Test Bank",
        "bik": "044525225",
        "city": "Moscow",
        "cor_payment": "30101810400000000225"
    })
}
