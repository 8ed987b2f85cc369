//! Shared application state.

use std::sync::Arc;

use hookline_core::clock::Clock;
use hookline_core::store::{ConfigStore, SubmissionStore};
use hookline_delivery::DeliveryClient;
use hookline_dispatch::application::backfill::BackfillCoordinator;
use hookline_dispatch::application::dispatch::DispatchEngine;
use hookline_dispatch::application::runs::BackfillRuns;

use crate::config::CallbackSecrets;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for submission timestamps and backfill windows.
    pub clock: Arc<dyn Clock>,
    /// Destination configuration.
    pub config_store: Arc<dyn ConfigStore>,
    /// Submission persistence.
    pub submission_store: Arc<dyn SubmissionStore>,
    /// Live dispatch.
    pub engine: DispatchEngine,
    /// Backfill replay.
    pub backfill: BackfillCoordinator,
    /// In-flight backfill runs.
    pub backfill_runs: BackfillRuns,
    /// Inbound callback secrets.
    pub callback_secrets: Arc<CallbackSecrets>,
}

impl AppState {
    /// Create new application state, wiring the engine and coordinator over
    /// the given stores and delivery client.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        config_store: Arc<dyn ConfigStore>,
        submission_store: Arc<dyn SubmissionStore>,
        delivery: DeliveryClient,
        callback_secrets: CallbackSecrets,
    ) -> Self {
        let engine = DispatchEngine::new(Arc::clone(&config_store), delivery);
        let backfill = BackfillCoordinator::new(
            Arc::clone(&submission_store),
            engine.clone(),
            Arc::clone(&clock),
        );
        Self {
            clock,
            config_store,
            submission_store,
            engine,
            backfill,
            backfill_runs: BackfillRuns::new(),
            callback_secrets: Arc::new(callback_secrets),
        }
    }
}
