// Shared fixtures for in-crate tests

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

use super::{migrations::run_migrations, AppConfig, AppState};
use crate::services::{Correction, Corrector};

pub const TEST_SECRET: &str = "test_secret_key";

/// Deterministic corrector so tests never reach the network
pub struct StubCorrector;

#[async_trait]
impl Corrector for StubCorrector {
    async fn correct(&self, text: &str) -> Correction {
        Correction {
            corrected_text: text.replace("thinked", "thought"),
            explanation: "stub explanation".to_string(),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        secret_key: TEST_SECRET.to_string(),
        access_token_expire_minutes: 30,
        bcrypt_cost: 4,
        openai_api_key: None,
        openai_model: "gpt-3.5-turbo".to_string(),
        openai_base_url: "http://127.0.0.1:1".to_string(),
        openai_max_retries: 1,
        cors_origins: vec!["http://localhost:3000".to_string()],
        port: 0,
        reset_db: false,
        seed_demo_user: false,
        accept_legacy_token_header: false,
    }
}

/// One connection, since every `sqlite::memory:` connection is its own database
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool, false).await.unwrap();
    pool
}

pub async fn test_state_with(config: AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(test_pool().await, config, Arc::new(StubCorrector)))
}

pub async fn test_state() -> Arc<AppState> {
    test_state_with(test_config()).await
}

pub fn test_app(state: Arc<AppState>) -> Router {
    crate::build_router(state)
}

/// Sends a request and returns status plus parsed JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={username}&password={password}"
        )))
        .unwrap()
}

/// Registers a user through the store and returns a fresh token for it
pub async fn register_and_token(state: &AppState, username: &str) -> (i64, String) {
    let user = state
        .users
        .create(username, &format!("{username}@example.com"), "Password123")
        .await
        .unwrap();
    let token = state
        .tokens
        .issue(user.id, state.config.access_token_ttl())
        .unwrap();
    (user.id, token.into_string())
}
