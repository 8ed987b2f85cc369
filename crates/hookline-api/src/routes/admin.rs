//! Operator routes: destination configuration and backfill.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use hookline_core::error::DomainError;
use hookline_core::platform::Platform;
use hookline_core::store::DestinationMap;
use hookline_dispatch::application::admin::{self, DestinationsView};
use hookline_dispatch::domain::backfill::BackfillResult;
use hookline_dispatch::domain::commands;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, Span, info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /admin/destinations/{platform}.
#[derive(Debug, Deserialize)]
pub struct SaveDestinationsRequest {
    /// Complete configuration. Categories left out are cleared.
    pub destinations: DestinationMap,
}

/// Request body for POST /admin/backfill.
#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    /// Days to look back. Signed so that out-of-range values reach validation.
    pub lookback_days: i64,
}

/// Response body for POST /admin/backfill/cancel.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// Number of runs signalled.
    pub cancelled_runs: usize,
}

/// GET /admin/destinations/{platform}
#[instrument(skip(state))]
async fn load_destinations(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<DestinationsView>, ApiError> {
    let platform: Platform = platform.parse()?;
    let view = admin::load_destinations(platform, state.config_store.as_ref()).await?;
    Ok(Json(view))
}

/// PUT /admin/destinations/{platform}
#[instrument(skip(state, request))]
async fn save_destinations(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Json(request): Json<SaveDestinationsRequest>,
) -> Result<Json<DestinationsView>, ApiError> {
    let command = commands::SaveDestinations {
        correlation_id: Uuid::new_v4(),
        platform: platform.parse()?,
        destinations: request.destinations,
    };

    info!(correlation_id = %command.correlation_id, "handling save_destinations command");

    let view = admin::handle_save_destinations(&command, state.config_store.as_ref()).await?;
    Ok(Json(view))
}

/// POST /admin/backfill
#[instrument(skip(state, request), fields(lookback_days = request.lookback_days))]
async fn resend(
    State(state): State<AppState>,
    Json(request): Json<ResendRequest>,
) -> Result<Json<BackfillResult>, ApiError> {
    let command = commands::ResendBackfill {
        correlation_id: Uuid::new_v4(),
        lookback_days: request.lookback_days,
    };

    let run = state.backfill_runs.start();
    info!(
        correlation_id = %command.correlation_id,
        run_id = %run.id(),
        "handling resend_backfill command"
    );

    // Dropping the request does not stop the run.
    let backfill = state.backfill.clone();
    let task = tokio::spawn(
        async move {
            let result = backfill.resend(&command, run.id(), run.token()).await;
            if let Err(err) = &result {
                warn!(run_id = %run.id(), error = %err, "backfill run failed");
            }
            result
        }
        .instrument(Span::current()),
    );

    let result = task.await.map_err(|err| {
        DomainError::Infrastructure(format!("backfill task did not complete: {err}"))
    })??;
    Ok(Json(result))
}

/// POST /admin/backfill/cancel
async fn cancel_backfills(State(state): State<AppState>) -> Json<CancelResponse> {
    let cancelled_runs = state.backfill_runs.cancel_all();
    info!(cancelled_runs, "backfill cancellation requested");
    Json(CancelResponse { cancelled_runs })
}

/// Returns the router for operator routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/destinations/{platform}",
            get(load_destinations).put(save_destinations),
        )
        .route("/admin/backfill", post(resend))
        .route("/admin/backfill/cancel", post(cancel_backfills))
}
