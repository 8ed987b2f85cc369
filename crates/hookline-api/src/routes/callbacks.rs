//! Signed inbound callbacks from automation platforms.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Router, routing::post};
use hookline_core::platform::Platform;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::signature::{self, SIGNATURE_HEADER};
use crate::state::AppState;

/// POST /callbacks/{platform}
async fn receive_callback(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let platform: Platform = platform.parse()?;
    let Some(secret) = state.callback_secrets.get(&platform) else {
        return Err(ApiError::CallbacksDisabled(platform));
    };

    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !signature::verify(secret, &body, provided) {
        warn!(%platform, "rejecting callback with invalid signature");
        return Err(ApiError::InvalidSignature);
    }

    info!(%platform, bytes = body.len(), "callback accepted");
    Ok(StatusCode::ACCEPTED)
}

/// Returns the router for inbound callbacks.
pub fn router() -> Router<AppState> {
    Router::new().route("/callbacks/{platform}", post(receive_callback))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use hookline_delivery::{DeliveryClient, DeliveryPolicy};
    use hookline_test_support::{
        FixedClock, InMemoryConfigStore, InMemorySubmissionStore, ScriptedTransport,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::CallbackSecrets;

    const SECRET: &str = "s3cret";

    fn app() -> Router {
        let secrets: CallbackSecrets = [(Platform::Make, SECRET.to_owned())].into_iter().collect();
        let state = AppState::new(
            Arc::new(FixedClock(Utc::now())),
            Arc::new(InMemoryConfigStore::new()),
            Arc::new(InMemorySubmissionStore::new()),
            DeliveryClient::new(Arc::new(ScriptedTransport::new()), DeliveryPolicy::default()),
            secrets,
        );
        router().with_state(state)
    }

    fn callback(platform: &str, body: &'static str, signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(format!("/callbacks/{platform}"))
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        json["error"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn test_valid_signature_is_accepted() {
        // Arrange
        let body = r#"{"status":"processed"}"#;
        let signature = signature::sign(SECRET, body.as_bytes()).unwrap();

        // Act
        let response = app()
            .oneshot(callback("make", body, Some(&signature)))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_missing_signature_is_rejected() {
        // Arrange
        let request = callback("make", "{}", None);

        // Act
        let response = app().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "invalid_signature");
    }

    #[tokio::test]
    async fn test_signature_for_other_body_is_rejected() {
        // Arrange
        let signature = signature::sign(SECRET, b"{\"status\":\"ok\"}").unwrap();

        // Act
        let response = app()
            .oneshot(callback("make", r#"{"status":"forged"}"#, Some(&signature)))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_platform_without_secret_is_disabled() {
        // Arrange
        let signature = signature::sign(SECRET, b"{}").unwrap();

        // Act
        let response = app()
            .oneshot(callback("zapier", "{}", Some(&signature)))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_code(response).await, "callbacks_disabled");
    }

    #[tokio::test]
    async fn test_unknown_platform_is_validation_error() {
        // Arrange
        let request = callback("ifttt", "{}", None);

        // Act
        let response = app().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "validation_error");
    }
}
