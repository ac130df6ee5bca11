//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use rolegate_api::{AppState, build_router};
use rolegate_auth::rbac::seed_default_catalog;
use rolegate_core::config::{AuthConfig, ServerConfig};
use rolegate_database::MemoryAuthStore;
use rolegate_database::store::{AuthStore, RoleGraphStore, UnitOfWork, UserStore};

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test application context over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryAuthStore,
}

impl TestApp {
    /// Create a new test application with the default catalogue seeded.
    pub async fn new() -> Self {
        let store = MemoryAuthStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            seed_default_catalog(uow.as_mut()).await.unwrap();
            uow.commit().await.unwrap();
        }

        let mut auth = AuthConfig::with_secret("api-test-secret");
        auth.argon2_memory_kib = 1024;
        auth.argon2_iterations = 1;

        let shared: Arc<dyn AuthStore> = Arc::new(store.clone());
        let state = AppState::new(shared, &auth).unwrap();
        let router = build_router(state, &ServerConfig::default());

        Self { router, store }
    }

    /// Send a request, optionally with a JSON body and bearer token.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register a user through the API and return the response body.
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/auth/register",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body
    }

    /// Attach a role to a user directly in the store.
    pub async fn grant_role(&self, user_id: i64, role: &str) {
        let mut uow = self.store.begin().await.unwrap();
        let role = uow.find_role_by_name(role).await.unwrap().unwrap();
        uow.assign_role(user_id, role.id).await.unwrap();
        uow.commit().await.unwrap();
    }

    /// Enable or disable a user directly in the store.
    pub async fn set_active(&self, user_id: i64, active: bool) {
        let mut uow = self.store.begin().await.unwrap();
        uow.set_user_active(user_id, active).await.unwrap();
        uow.commit().await.unwrap();
    }
}
