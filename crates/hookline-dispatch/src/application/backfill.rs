//! Backfill: replay a window of historical submissions.
//!
//! Replay is not idempotent at the destination. Events already delivered
//! live are delivered again; no receipt ledger exists to suppress them.

use std::sync::Arc;

use hookline_core::category::EventCategory;
use hookline_core::clock::Clock;
use hookline_core::error::DomainError;
use hookline_core::outcome::DispatchSource;
use hookline_core::store::SubmissionStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::application::dispatch::DispatchEngine;
use crate::domain::backfill::{BackfillResult, LookbackDays};
use crate::domain::commands::ResendBackfill;

/// Drives historical submissions through the dispatch engine.
#[derive(Clone)]
pub struct BackfillCoordinator {
    submissions: Arc<dyn SubmissionStore>,
    engine: DispatchEngine,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for BackfillCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackfillCoordinator")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl BackfillCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(
        submissions: Arc<dyn SubmissionStore>,
        engine: DispatchEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            submissions,
            engine,
            clock,
        }
    }

    /// Replays every submission created in `[now - lookback, now]`,
    /// category by category and oldest first within each category.
    ///
    /// `cancel` is checked before each category and each submission. A
    /// cancelled run returns normally with `cancelled` set and the counts
    /// of the work already done.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LookbackOutOfRange` before touching the store if
    /// the lookback is outside `1..=30`. Returns `DomainError` if a
    /// submission query or a configuration read fails.
    #[instrument(skip(self, command, cancel), fields(
        correlation_id = %command.correlation_id,
        lookback_days = command.lookback_days,
        %run_id,
    ))]
    pub async fn resend(
        &self,
        command: &ResendBackfill,
        run_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<BackfillResult, DomainError> {
        let lookback = LookbackDays::new(command.lookback_days)?;
        let window_end = self.clock.now();
        let window_start = window_end - lookback.as_delta();
        let mut result = BackfillResult::new(run_id, lookback, window_start, window_end);

        'categories: for category in EventCategory::ALL {
            if cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            let mut submissions = self
                .submissions
                .list_between(category, window_start, window_end)
                .await?;
            // Oldest first, whatever order the store returned.
            submissions.sort_by_key(|s| (s.created_at, s.id));
            info!(%category, count = submissions.len(), "replaying category");

            for submission in &submissions {
                if cancel.is_cancelled() {
                    result.cancelled = true;
                    break 'categories;
                }
                let source = DispatchSource::Backfill {
                    submission_id: submission.id,
                };
                let outcomes = self.engine.dispatch_submission(submission, source).await?;
                result.record(submission.id, category, &outcomes);
            }
        }

        if result.cancelled {
            warn!(failures = result.failures.len(), "backfill cancelled by operator");
        } else {
            info!(failures = result.failures.len(), "backfill finished");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use hookline_core::platform::Platform;
    use hookline_core::transport::{HttpTransport, TransportError};
    use hookline_delivery::{DeliveryClient, DeliveryPolicy};
    use hookline_test_support::{
        FailingSubmissionStore, FixedClock, InMemoryConfigStore, InMemorySubmissionStore,
        ScriptedTransport,
    };
    use serde_json::json;

    use super::*;

    const HOOK_A: &str = "https://hook.example/a";
    const HOOK_B: &str = "https://hook.example/b";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn command(lookback_days: i64) -> ResendBackfill {
        ResendBackfill {
            correlation_id: Uuid::new_v4(),
            lookback_days,
        }
    }

    fn coordinator(
        submissions: Arc<InMemorySubmissionStore>,
        config: InMemoryConfigStore,
        transport: &Arc<ScriptedTransport>,
    ) -> BackfillCoordinator {
        let delivery = DeliveryClient::new(
            transport.clone(),
            DeliveryPolicy {
                timeout: Duration::from_secs(1),
                max_attempts: 3,
                backoff: Duration::ZERO,
            },
        );
        let engine = DispatchEngine::new(Arc::new(config), delivery);
        BackfillCoordinator::new(submissions, engine, Arc::new(FixedClock(now())))
    }

    fn zapier_service_signup() -> InMemoryConfigStore {
        InMemoryConfigStore::with_entries(&[(
            Platform::Zapier,
            EventCategory::ServiceSignup,
            HOOK_A,
        )])
    }

    #[tokio::test]
    async fn test_resend_counts_processed_per_category() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        for hours in [1, 30, 100] {
            store.seed(
                EventCategory::ServiceSignup,
                json!({ "name": "Jane", "zip": "10001" }),
                now() - TimeDelta::hours(hours),
            );
        }
        let transport = Arc::new(ScriptedTransport::new().always(HOOK_A, 200));
        let coordinator = coordinator(store, zapier_service_signup(), &transport);

        // Act
        let result = coordinator
            .resend(&command(7), Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        let service = result.category(EventCategory::ServiceSignup).unwrap();
        assert_eq!(service.processed, 3);
        assert_eq!(service.platforms[&Platform::Zapier].delivered, 3);
        assert_eq!(service.platforms[&Platform::Make].not_configured, 3);
        assert_eq!(result.category(EventCategory::EsimCallback).unwrap().processed, 0);
        assert!(!result.cancelled);
        assert!(result.failures.is_empty());
        assert_eq!(result.lookback_days, 7);
    }

    #[tokio::test]
    async fn test_resend_rejects_invalid_lookback_before_querying() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        let transport = Arc::new(ScriptedTransport::new());
        let coordinator = coordinator(store.clone(), InMemoryConfigStore::new(), &transport);

        for lookback_days in [0, -1, 31] {
            // Act
            let result = coordinator
                .resend(&command(lookback_days), Uuid::new_v4(), &CancellationToken::new())
                .await;

            // Assert
            assert!(matches!(result, Err(DomainError::LookbackOutOfRange { .. })));
        }
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_window_lower_bound_is_inclusive() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        let lower = now() - TimeDelta::days(7);
        let included = store.seed(EventCategory::ServiceSignup, json!({ "n": 1 }), lower);
        store.seed(
            EventCategory::ServiceSignup,
            json!({ "n": 2 }),
            lower - TimeDelta::microseconds(1),
        );
        let transport = Arc::new(ScriptedTransport::new().always(HOOK_A, 200));
        let coordinator = coordinator(store, zapier_service_signup(), &transport);

        // Act
        let result = coordinator
            .resend(&command(7), Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(result.window_start, lower);
        assert_eq!(result.category(EventCategory::ServiceSignup).unwrap().processed, 1);
        assert_eq!(transport.calls()[0].1["submission_id"], included.to_string());
    }

    #[tokio::test]
    async fn test_replays_oldest_first() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        let newest = store.seed(EventCategory::ServiceSignup, json!({ "n": 3 }), now());
        let oldest = store.seed(
            EventCategory::ServiceSignup,
            json!({ "n": 1 }),
            now() - TimeDelta::days(2),
        );
        let middle = store.seed(
            EventCategory::ServiceSignup,
            json!({ "n": 2 }),
            now() - TimeDelta::days(1),
        );
        let transport = Arc::new(ScriptedTransport::new().always(HOOK_A, 200));
        let coordinator = coordinator(store, zapier_service_signup(), &transport);

        // Act
        coordinator
            .resend(&command(3), Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        let order: Vec<String> = transport
            .calls()
            .iter()
            .map(|(_, body)| body["submission_id"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(
            order,
            vec![oldest.to_string(), middle.to_string(), newest.to_string()]
        );
    }

    #[tokio::test]
    async fn test_failures_are_listed_and_do_not_abort_run() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        let first = store.seed(
            EventCategory::IptvSignup,
            json!({ "email": "a@example.com" }),
            now() - TimeDelta::hours(2),
        );
        store.seed(
            EventCategory::IptvSignup,
            json!({ "email": "b@example.com" }),
            now() - TimeDelta::hours(1),
        );
        let transport = Arc::new(
            ScriptedTransport::new()
                .always(HOOK_A, 200)
                .always(HOOK_B, 503),
        );
        let config = InMemoryConfigStore::with_entries(&[
            (Platform::Zapier, EventCategory::IptvSignup, HOOK_A),
            (Platform::Make, EventCategory::IptvSignup, HOOK_B),
        ]);
        let coordinator = coordinator(store, config, &transport);

        // Act
        let result = coordinator
            .resend(&command(1), Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        let iptv = result.category(EventCategory::IptvSignup).unwrap();
        assert_eq!(iptv.processed, 2);
        assert_eq!(iptv.platforms[&Platform::Zapier].delivered, 2);
        assert_eq!(iptv.platforms[&Platform::Make].failed, 2);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.failures[0].submission_id, first);
        assert_eq!(result.failures[0].http_status, Some(503));
        assert_eq!(result.failures[0].attempts, 3);
    }

    #[tokio::test]
    async fn test_repeated_resend_yields_identical_counts() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        store.seed(EventCategory::ServiceSignup, json!({ "n": 1 }), now() - TimeDelta::days(1));
        store.seed(EventCategory::EsimCallback, json!({ "n": 2 }), now() - TimeDelta::days(2));
        let transport = Arc::new(ScriptedTransport::new().always(HOOK_A, 200));
        let coordinator = coordinator(store, zapier_service_signup(), &transport);

        // Act
        let first = coordinator
            .resend(&command(5), Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap();
        let second = coordinator
            .resend(&command(5), Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(first.categories, second.categories);
        assert_eq!(first.failures, second.failures);
        // Duplicates at the destination are expected.
        assert_eq!(transport.calls_to(HOOK_A), 2);
    }

    #[tokio::test]
    async fn test_cancelled_run_reports_completed_work_only() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        store.seed(EventCategory::ServiceSignup, json!({ "n": 1 }), now());
        let transport = Arc::new(ScriptedTransport::new().always(HOOK_A, 200));
        let coordinator = coordinator(store.clone(), zapier_service_signup(), &transport);
        let cancel = CancellationToken::new();
        cancel.cancel();

        // Act
        let result = coordinator
            .resend(&command(7), Uuid::new_v4(), &cancel)
            .await
            .unwrap();

        // Assert
        assert!(result.cancelled);
        assert_eq!(result.category(EventCategory::ServiceSignup).unwrap().processed, 0);
        assert!(store.queries().is_empty());
        assert!(transport.calls().is_empty());
    }

    /// Cancels `token` as soon as the first delivery is attempted.
    struct CancelOnFirstCall(CancellationToken);

    #[async_trait::async_trait]
    impl HttpTransport for CancelOnFirstCall {
        async fn post_json(
            &self,
            _url: &str,
            _body: &serde_json::Value,
            _timeout: Duration,
        ) -> Result<u16, TransportError> {
            self.0.cancel();
            Ok(200)
        }
    }

    #[tokio::test]
    async fn test_cancellation_mid_run_keeps_completed_prefix() {
        // Arrange
        let store = Arc::new(InMemorySubmissionStore::new());
        for hours in [3, 2, 1] {
            store.seed(
                EventCategory::ServiceSignup,
                json!({ "n": hours }),
                now() - TimeDelta::hours(hours),
            );
        }
        let cancel = CancellationToken::new();
        let delivery = DeliveryClient::new(
            Arc::new(CancelOnFirstCall(cancel.clone())),
            DeliveryPolicy::default(),
        );
        let engine = DispatchEngine::new(Arc::new(zapier_service_signup()), delivery);
        let coordinator = BackfillCoordinator::new(store, engine, Arc::new(FixedClock(now())));

        // Act
        let result = coordinator
            .resend(&command(1), Uuid::new_v4(), &cancel)
            .await
            .unwrap();

        // Assert
        assert!(result.cancelled);
        let service = result.category(EventCategory::ServiceSignup).unwrap();
        assert_eq!(service.processed, 1);
        assert_eq!(service.platforms[&Platform::Zapier].delivered, 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        // Arrange
        let transport = Arc::new(ScriptedTransport::new());
        let delivery = DeliveryClient::new(transport.clone(), DeliveryPolicy::default());
        let engine = DispatchEngine::new(Arc::new(InMemoryConfigStore::new()), delivery);
        let coordinator = BackfillCoordinator::new(
            Arc::new(FailingSubmissionStore),
            engine,
            Arc::new(FixedClock(now())),
        );

        // Act
        let result = coordinator
            .resend(&command(7), Uuid::new_v4(), &CancellationToken::new())
            .await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
