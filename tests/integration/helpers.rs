//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tower::ServiceExt;

use pos_api::AppState;
use pos_auth::{AuthService, MemorySessionStore, MemoryUserDirectory};
use pos_core::config::AppConfig;
use pos_core::events::{BroadcastEventBus, PublishedEvent};
use pos_core::types::TenantId;
use pos_entity::tenant::Tenant;

/// Password that satisfies the default policy.
pub const PASSWORD: &str = "Secret1234";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Directory backing the app, for direct manipulation
    pub directory: Arc<MemoryUserDirectory>,
    /// Session store backing the app
    pub sessions: Arc<MemorySessionStore>,
    /// Receives every published domain event
    pub events: broadcast::Receiver<PublishedEvent>,
}

/// A response captured as status plus parsed JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.auth.bcrypt_cost = 4;
        config.validate("test").expect("test config is valid");

        let directory = Arc::new(MemoryUserDirectory::with_defaults().await);
        directory
            .insert_tenant(Tenant {
                id: TenantId::new(2),
                name: "Second Store".to_string(),
                is_active: true,
                trial_ends_at: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await;
        let sessions = Arc::new(MemorySessionStore::new());
        let bus = BroadcastEventBus::new(64);
        let events = bus.subscribe();

        let auth = AuthService::new(
            &config.auth,
            &config.session,
            directory.clone(),
            sessions.clone(),
            Arc::new(bus),
        )
        .expect("auth service");

        let state = AppState::new(Arc::new(config), auth, None);
        Self {
            router: pos_api::build_router(state),
            directory,
            sessions,
            events,
        }
    }

    /// Send a request and capture the response.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_vec(&v).expect("serialize body")),
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Register a user in tenant 1 through the API.
    pub async fn register(&self, username: &str) -> TestResponse {
        self.register_in(1, username).await
    }

    /// Register a user in the given tenant through the API.
    pub async fn register_in(&self, tenant_id: i64, username: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "tenant_id": tenant_id,
                "username": username,
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
                "full_name": format!("{username} Tester"),
            })),
            None,
        )
        .await
    }

    /// Log in and return the response.
    pub async fn login(&self, tenant_id: i64, label: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "tenant_id": tenant_id,
                "identity_label": label,
                "password": password,
            })),
            None,
        )
        .await
    }

    /// Register then log in, returning `(access_token, refresh_token)`.
    pub async fn signed_in(&self, username: &str) -> (String, String) {
        let registered = self.register(username).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);
        let login = self.login(1, username, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        (
            login.body["data"]["access_token"]
                .as_str()
                .expect("access token")
                .to_string(),
            login.body["data"]["refresh_token"]
                .as_str()
                .expect("refresh token")
                .to_string(),
        )
    }

    /// Drain and return the event types published so far.
    pub fn drain_event_types(&mut self) -> Vec<String> {
        let mut types = Vec::new();
        while let Ok(published) = self.events.try_recv() {
            types.push(published.event.event_type);
        }
        types
    }
}
