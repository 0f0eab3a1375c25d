#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use skillstack_api::auth::jwt::JwtConfig;
use skillstack_api::config::ServerConfig;
use skillstack_api::router::build_app_router;
use skillstack_api::state::AppState;
use skillstack_core::engine::EngineConfig;
use skillstack_core::memory::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "skillstack-integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        engine: EngineConfig::default(),
        min_password_length: 6,
    }
}

/// Full application router over an in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with_store().0
}

/// Like [`build_test_app`], also returning the store for direct inspection.
pub fn build_test_app_with_store() -> (Router, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), config.clone());
    (build_app_router(state, &config), store)
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send one request through a clone of the router.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Register `username` and return its access token.
pub async fn register(app: &Router, username: &str) -> String {
    let response = post_json(
        app,
        "/api/auth/register",
        json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "secret-pass",
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "registration of {username} failed");
    let json = body_json(response).await;
    json["data"]["access_token"].as_str().unwrap().to_string()
}

/// Create a skill for the token's user and return its id.
pub async fn create_skill(app: &Router, token: &str, name: &str, target_hours: f64) -> i64 {
    let response = post_json_auth(
        app,
        "/api/skills",
        json!({
            "name": name,
            "resource_type": "course",
            "platform": "online",
            "target_hours": target_hours,
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["skill_id"].as_i64().unwrap()
}
