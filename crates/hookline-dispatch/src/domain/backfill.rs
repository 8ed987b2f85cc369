//! Backfill accounting.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::outcome::{DispatchOutcome, OutcomeStatus};
use hookline_core::platform::Platform;
use serde::Serialize;
use uuid::Uuid;

/// A validated backfill lookback, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackDays(u32);

impl LookbackDays {
    /// Smallest accepted lookback.
    pub const MIN: u32 = 1;
    /// Largest accepted lookback.
    pub const MAX: u32 = 30;

    /// Validates a requested lookback. Out-of-range values are rejected,
    /// never clamped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LookbackOutOfRange` naming both bounds.
    pub fn new(requested: i64) -> Result<Self, DomainError> {
        u32::try_from(requested)
            .ok()
            .filter(|days| (Self::MIN..=Self::MAX).contains(days))
            .map(Self)
            .ok_or(DomainError::LookbackOutOfRange {
                requested,
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    /// Number of days.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// The lookback as a time span.
    #[must_use]
    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::days(i64::from(self.0))
    }
}

/// Delivery counts for one platform within one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformTally {
    /// Submissions the platform accepted.
    pub delivered: u64,
    /// Submissions that failed after retries.
    pub failed: u64,
    /// Submissions skipped because no URL was configured.
    pub not_configured: u64,
}

/// Counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    /// Submissions replayed.
    pub processed: u64,
    /// Per-platform delivery counts. Every platform is present.
    pub platforms: BTreeMap<Platform, PlatformTally>,
}

impl Default for CategoryTally {
    fn default() -> Self {
        Self {
            processed: 0,
            platforms: Platform::ALL
                .into_iter()
                .map(|platform| (platform, PlatformTally::default()))
                .collect(),
        }
    }
}

/// One failed delivery during a backfill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfillFailure {
    /// The submission that was replayed.
    pub submission_id: Uuid,
    /// Its category.
    pub category: EventCategory,
    /// The platform that did not accept it.
    pub platform: Platform,
    /// Last HTTP status received, if any.
    pub http_status: Option<u16>,
    /// Last error.
    pub error_message: Option<String>,
    /// Attempts made.
    pub attempts: u32,
}

/// Aggregate produced by one backfill run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfillResult {
    /// Identifier of the run.
    pub run_id: Uuid,
    /// The validated lookback.
    pub lookback_days: u32,
    /// Inclusive lower bound of the replayed window.
    pub window_start: DateTime<Utc>,
    /// Inclusive upper bound of the replayed window.
    pub window_end: DateTime<Utc>,
    /// Whether the run was stopped by an operator before finishing.
    pub cancelled: bool,
    /// Per-category counts. Every category is present.
    pub categories: BTreeMap<EventCategory, CategoryTally>,
    /// Failed deliveries, in processing order.
    pub failures: Vec<BackfillFailure>,
}

impl BackfillResult {
    /// An empty result for the given window.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        lookback: LookbackDays,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            lookback_days: lookback.get(),
            window_start,
            window_end,
            cancelled: false,
            categories: EventCategory::ALL
                .into_iter()
                .map(|category| (category, CategoryTally::default()))
                .collect(),
            failures: Vec::new(),
        }
    }

    /// Folds the outcomes of one replayed submission into the totals.
    pub fn record(
        &mut self,
        submission_id: Uuid,
        category: EventCategory,
        outcomes: &[DispatchOutcome],
    ) {
        let tally = self.categories.entry(category).or_default();
        tally.processed += 1;

        for outcome in outcomes {
            let counts = tally.platforms.entry(outcome.platform).or_default();
            match outcome.status {
                OutcomeStatus::Delivered => counts.delivered += 1,
                OutcomeStatus::NotConfigured => counts.not_configured += 1,
                OutcomeStatus::Failed => {
                    counts.failed += 1;
                    self.failures.push(BackfillFailure {
                        submission_id,
                        category,
                        platform: outcome.platform,
                        http_status: outcome.http_status,
                        error_message: outcome.error_message.clone(),
                        attempts: outcome.attempts,
                    });
                }
            }
        }
    }

    /// Counts for `category`.
    #[must_use]
    pub fn category(&self, category: EventCategory) -> Option<&CategoryTally> {
        self.categories.get(&category)
    }
}
