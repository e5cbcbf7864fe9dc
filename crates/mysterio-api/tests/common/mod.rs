//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mysterio_scenario::{ScenarioSchema, ScenarioSource, TemplateScenarioGenerator};
use mysterio_session::domain::aggregates::GameSession;
use mysterio_store::InMemoryRepository;
use mysterio_test_support::FixedClock;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use mysterio_api::state::AppState;

/// Build the full app router over a fresh in-memory store, the built-in
/// template generator, and a fixed clock. Uses the same routes as `main.rs`.
pub fn build_test_app() -> Router {
    let scenarios = ScenarioSource::new(
        Arc::new(TemplateScenarioGenerator::new()),
        Arc::new(ScenarioSchema::standard()),
        Duration::from_secs(5),
    );
    let app_state = AppState::new(
        Arc::new(FixedClock::default()),
        Arc::new(InMemoryRepository::<GameSession>::new()),
        scenarios,
        CancellationToken::new(),
    );
    mysterio_api::app(app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with an optional acting player and JSON body.
pub async fn post_json(
    app: Router,
    uri: &str,
    player_id: Option<&str>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(player_id) = player_id {
        builder = builder.header("X-Player-Id", player_id);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a bodiless POST request on behalf of `player_id`.
pub async fn post_as(app: Router, uri: &str, player_id: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Player-Id", player_id)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request, optionally on behalf of a player.
pub async fn get_json(
    app: Router,
    uri: &str,
    player_id: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(player_id) = player_id {
        builder = builder.header("X-Player-Id", player_id);
    }
    let request = builder.body(Body::empty()).unwrap();

    send(app, request).await
}
