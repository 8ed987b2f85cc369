//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use hookline_api::config::CallbackSecrets;
use hookline_api::routes;
use hookline_api::state::AppState;
use hookline_core::transport::HttpTransport;
use hookline_delivery::{DeliveryClient, DeliveryPolicy};
use hookline_dispatch::application::runs::BackfillRuns;
use hookline_test_support::{
    FixedClock, InMemoryConfigStore, InMemorySubmissionStore, ScriptedTransport,
};
use tower::ServiceExt;

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// The app router plus handles on its in-memory collaborators.
pub struct TestApp<T = ScriptedTransport> {
    pub router: Router,
    pub config_store: Arc<InMemoryConfigStore>,
    pub submissions: Arc<InMemorySubmissionStore>,
    pub transport: Arc<T>,
    pub backfill_runs: BackfillRuns,
}

/// Build the full app router over in-memory stores, a fixed clock and the
/// given scripted transport. Uses the same route structure as `main.rs`.
pub fn build_test_app(transport: ScriptedTransport) -> TestApp {
    build_test_app_with(transport)
}

/// Like `build_test_app`, over any transport.
pub fn build_test_app_with<T: HttpTransport + 'static>(transport: T) -> TestApp<T> {
    let config_store = Arc::new(InMemoryConfigStore::new());
    let submissions = Arc::new(InMemorySubmissionStore::new());
    let transport = Arc::new(transport);
    let delivery = DeliveryClient::new(
        transport.clone(),
        DeliveryPolicy {
            timeout: Duration::from_secs(1),
            max_attempts: 3,
            backoff: Duration::ZERO,
        },
    );
    let app_state = AppState::new(
        Arc::new(FixedClock(fixed_now())),
        config_store.clone(),
        submissions.clone(),
        delivery,
        CallbackSecrets::new(),
    );
    let backfill_runs = app_state.backfill_runs.clone();

    TestApp {
        router: routes::app().with_state(app_state),
        config_store,
        submissions,
        transport,
        backfill_runs,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
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
