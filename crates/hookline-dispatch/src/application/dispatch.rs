//! Live dispatch: one event, every configured platform.

use std::sync::Arc;

use futures::future::join_all;
use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::outcome::{DispatchOutcome, DispatchSource, OutcomeStatus};
use hookline_core::platform::Platform;
use hookline_core::store::ConfigStore;
use hookline_core::submission::{Payload, Submission};
use hookline_delivery::DeliveryClient;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::domain::payload::{canonical_payload, event_payload};

/// Resolves destinations for an event and delivers to each of them
/// concurrently.
///
/// The engine owns breadth across platforms; per-destination retries belong
/// to the `DeliveryClient`.
#[derive(Clone)]
pub struct DispatchEngine {
    config_store: Arc<dyn ConfigStore>,
    delivery: DeliveryClient,
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine")
            .field("delivery", &self.delivery)
            .finish_non_exhaustive()
    }
}

impl DispatchEngine {
    /// Creates an engine reading destinations from `config_store`.
    #[must_use]
    pub fn new(config_store: Arc<dyn ConfigStore>, delivery: DeliveryClient) -> Self {
        Self {
            config_store,
            delivery,
        }
    }

    /// Dispatches an ad-hoc event with no stored submission behind it.
    ///
    /// The body is `event_payload`: the fields plus `event_category`, without
    /// the `submission_id` and `submitted_at` keys that `dispatch_submission`
    /// sends. Recorded submissions should go through `dispatch_submission` so
    /// live and backfill deliveries carry the same body.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the destination configuration cannot be read.
    /// Delivery failures are reported as outcomes, not errors.
    pub async fn dispatch_live(
        &self,
        category: EventCategory,
        payload: &Payload,
    ) -> Result<Vec<DispatchOutcome>, DomainError> {
        self.fan_out(category, event_payload(category, payload), DispatchSource::Live)
            .await
    }

    /// Dispatches a stored submission using its canonical payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if the destination configuration cannot be read.
    pub async fn dispatch_submission(
        &self,
        submission: &Submission,
        source: DispatchSource,
    ) -> Result<Vec<DispatchOutcome>, DomainError> {
        self.fan_out(submission.category, canonical_payload(submission), source)
            .await
    }

    #[instrument(skip(self, body), fields(%category))]
    async fn fan_out(
        &self,
        category: EventCategory,
        body: Value,
        source: DispatchSource,
    ) -> Result<Vec<DispatchOutcome>, DomainError> {
        // Snapshot the configuration before sending anything; later edits do
        // not affect this dispatch.
        let mut destinations: Vec<(Platform, Option<String>)> =
            Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let url = self.config_store.get(platform, category).await?;
            destinations.push((platform, url.filter(|u| !u.trim().is_empty())));
        }

        let deliveries = destinations.into_iter().map(|(platform, url)| {
            let body = &body;
            async move {
                let Some(url) = url else {
                    debug!(%platform, "no destination configured, skipping");
                    return DispatchOutcome::not_configured(platform, category, source);
                };
                let report = self.delivery.deliver(&url, body).await;
                if report.delivered {
                    info!(%platform, attempts = report.attempts, "event delivered");
                }
                DispatchOutcome {
                    platform,
                    category,
                    source,
                    status: if report.delivered {
                        OutcomeStatus::Delivered
                    } else {
                        OutcomeStatus::Failed
                    },
                    http_status: report.http_status,
                    error_message: report.error_message,
                    attempts: report.attempts,
                }
            }
        });

        Ok(join_all(deliveries).await)
    }
}
