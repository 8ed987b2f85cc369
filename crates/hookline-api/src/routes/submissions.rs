//! Intake route: record a submission and dispatch it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use chrono::{DateTime, Utc};
use hookline_core::category::EventCategory;
use hookline_core::outcome::DispatchOutcome;
use hookline_core::submission::Payload;
use hookline_dispatch::application::intake;
use hookline_dispatch::domain::commands;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

fn dispatch_by_default() -> bool {
    true
}

/// Request body for POST /submissions.
#[derive(Debug, Deserialize)]
pub struct RecordSubmissionRequest {
    /// The kind of action submitted.
    pub category: EventCategory,
    /// Flat form fields.
    pub payload: Payload,
    /// Dispatch immediately after recording. Defaults to `true`.
    #[serde(default = "dispatch_by_default")]
    pub dispatch: bool,
}

/// Response body for a recorded submission.
#[derive(Debug, Serialize)]
pub struct RecordSubmissionResponse {
    /// Id assigned to the submission.
    pub submission_id: Uuid,
    /// When it was recorded.
    pub created_at: DateTime<Utc>,
    /// Per-platform dispatch outcomes.
    pub outcomes: Vec<DispatchOutcome>,
    /// Why live dispatch could not run, if it could not.
    pub dispatch_error: Option<String>,
}

/// POST /submissions
#[instrument(skip(state, request), fields(category = %request.category))]
async fn record_submission(
    State(state): State<AppState>,
    Json(request): Json<RecordSubmissionRequest>,
) -> Result<(StatusCode, Json<RecordSubmissionResponse>), ApiError> {
    let command = commands::RecordSubmission {
        correlation_id: Uuid::new_v4(),
        category: request.category,
        payload: request.payload,
        dispatch: request.dispatch,
    };

    info!(correlation_id = %command.correlation_id, "handling record_submission command");

    let receipt = intake::handle_record_submission(
        &command,
        state.clock.as_ref(),
        state.submission_store.as_ref(),
        &state.engine,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordSubmissionResponse {
            submission_id: receipt.submission.id,
            created_at: receipt.submission.created_at,
            outcomes: receipt.outcomes,
            dispatch_error: receipt.dispatch_error,
        }),
    ))
}

/// Returns the router for submission intake.
pub fn router() -> Router<AppState> {
    Router::new().route("/submissions", post(record_submission))
}
