//! Shared helpers for alchemy-api integration tests

#![allow(dead_code)]

use alchemy_api::{build_router, AppState};
use alchemy_common::config::Settings;
use alchemy_common::db::init_memory_database;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

pub const API: &str = "/api/v1";

/// State over a fresh in-memory database
pub async fn setup_state(settings: Settings) -> AppState {
    let db = init_memory_database()
        .await
        .expect("Should create in-memory database");
    AppState::new(db, settings)
}

/// Router over a fresh in-memory database
pub async fn setup_app(settings: Settings) -> Router {
    build_router(setup_state(settings).await)
}

pub async fn default_app() -> Router {
    setup_app(Settings::default()).await
}

pub fn request(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Send one request and return status plus parsed JSON body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request(method, uri, body.as_ref()))
        .await
        .unwrap();
    let status = response.status();
    (status, extract_json(response).await)
}

/// Create a user with a stored MBTI type and return its id
pub async fn create_profiled_user(app: &Router, email: &str, mbti: &str) -> i64 {
    let (status, user) = send(
        app,
        "POST",
        &format!("{}/users", API),
        Some(serde_json::json!({"email": email, "name": email})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().unwrap();

    let (status, _) = send(
        app,
        "PUT",
        &format!("{}/users/{}/profile", API, user_id),
        Some(serde_json::json!({"jungian_type": mbti})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    user_id
}
