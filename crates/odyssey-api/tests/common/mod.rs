//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use odyssey_core::clock::Clock;
use odyssey_core::repository::ContentRepository;
use odyssey_session::domain::config::GameConfig;
use odyssey_test_support::{
    FixedClock, MockRng, StaticContentRepository, question, rng_factory, scenario,
    scenario_with_bonus,
};
use tower::ServiceExt;

use odyssey_api::routes;
use odyssey_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// A small content set: three scenarios and three questions.
pub fn sample_content() -> StaticContentRepository {
    StaticContentRepository::new(
        vec![
            scenario_with_bonus("Storm at night", 30, 10, 2),
            scenario("Calm sea", 5, 15),
            scenario("Mountain pass", 20, 40),
        ],
        vec![
            question("Largest ocean?", 2, 10),
            question("Longest river?", 1, 20),
            question("Highest peak?", 3, 30),
        ],
    )
}

/// Build the full app router with the given content and config, and a
/// deterministic Clock/RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app_with(
    content: Arc<dyn ContentRepository>,
    config: GameConfig,
) -> Router {
    let app_state = AppState::new(config, fixed_clock(), rng_factory(MockRng), content);

    routes::app_router().with_state(app_state)
}

/// Build the full app router over [`sample_content`] with default config.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(sample_content()), GameConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
