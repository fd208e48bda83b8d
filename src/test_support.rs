use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{app::build_app, state::AppState};

pub async fn test_app() -> Router {
    build_app(AppState::in_memory().await)
}

pub async fn test_app_with_state() -> (Router, AppState) {
    let state = AppState::in_memory().await;
    (build_app(state.clone()), state)
}

/// Sends one request through the router. Non-JSON response bodies come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let body = json!({ "username": username, "password": password });
    send(app, Method::POST, "/api/register", None, Some(body)).await
}

pub async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let body = json!({ "username": username, "password": password });
    send(app, Method::POST, "/api/login", None, Some(body)).await
}

/// Registers the user and returns a fresh access token.
pub async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, _) = register(app, username, password).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = login(app, username, password).await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}
