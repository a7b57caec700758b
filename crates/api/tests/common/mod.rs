#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use typeboard_core::admin_gate::{issue_flag, ADMIN_FLAG_NAME};
use typeboard_core::player::{Player, PlayerInput, PlayerPatch};
use typeboard_core::store::{OnChange, PlayerStore, StoreError, Subscription};
use typeboard_core::types::PlayerId;
use typeboard_sync::MemoryPlayerStore;

use typeboard_api::config::{LogFormat, ServerConfig, StoreBackend};
use typeboard_api::router::build_app_router;
use typeboard_api::state::AppState;

pub const TEST_PASSWORD: &str = "correct horse";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        admin_password: TEST_PASSWORD.to_string(),
        store_backend: StoreBackend::Memory,
        database_url: None,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over `store`, with the controller
/// already started.
pub async fn build_app_with(store: Arc<dyn PlayerStore>) -> (Router, AppState) {
    let config = test_config();
    let state = AppState::new(store, config.clone());
    state.controller.start().await;
    let app = build_app_router(state.clone(), &config);
    (app, state)
}

/// [`build_app_with`] over an empty in-memory store.
pub async fn build_test_app() -> (Router, AppState) {
    build_app_with(Arc::new(MemoryPlayerStore::new())).await
}

/// `Cookie` header value that unlocks the admin area.
pub fn admin_cookie() -> String {
    format!("{ADMIN_FLAG_NAME}={}", issue_flag(TEST_PASSWORD))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn admin_get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&admin_cookie()), None).await
}

pub async fn admin_post(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(&admin_cookie()), Some(body)).await
}

pub async fn admin_put(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&admin_cookie()), Some(body)).await
}

pub async fn admin_delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&admin_cookie()), None).await
}

/// Let reloads triggered by store notifications finish.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Store doubles
// ---------------------------------------------------------------------------

/// Store whose every call fails as if the database were down.
pub struct DownStore;

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".into())
}

#[async_trait]
impl PlayerStore for DownStore {
    async fn list(&self) -> Result<Vec<Player>, StoreError> {
        Err(down())
    }

    async fn insert(&self, _input: &PlayerInput) -> Result<Player, StoreError> {
        Err(down())
    }

    async fn update(&self, _id: PlayerId, _patch: &PlayerPatch) -> Result<u64, StoreError> {
        Err(down())
    }

    async fn remove(&self, _id: PlayerId) -> Result<u64, StoreError> {
        Err(down())
    }

    fn subscribe(&self, _on_change: OnChange) -> Subscription {
        Subscription::new(CancellationToken::new())
    }
}
