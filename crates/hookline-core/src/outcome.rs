//! Per-destination dispatch outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::EventCategory;
use crate::platform::Platform;

/// What triggered a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchSource {
    /// Immediate delivery of a newly recorded submission.
    Live,
    /// Replay of a historical submission.
    Backfill {
        /// The submission being replayed.
        submission_id: Uuid,
    },
}

/// Final state of one destination for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The destination answered with a 2xx status.
    Delivered,
    /// Every attempt failed.
    Failed,
    /// No URL is configured for this platform and category.
    NotConfigured,
}

/// Result of attempting delivery to one destination for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// The platform the destination belongs to.
    pub platform: Platform,
    /// The event category dispatched.
    pub category: EventCategory,
    /// Live or backfill.
    pub source: DispatchSource,
    /// Final state.
    pub status: OutcomeStatus,
    /// Last HTTP status received, if any response arrived.
    pub http_status: Option<u16>,
    /// Last error, if the outcome is a failure.
    pub error_message: Option<String>,
    /// Number of HTTP attempts made.
    pub attempts: u32,
}

impl DispatchOutcome {
    /// Outcome for a platform with no configured URL. No attempt is made.
    #[must_use]
    pub fn not_configured(
        platform: Platform,
        category: EventCategory,
        source: DispatchSource,
    ) -> Self {
        Self {
            platform,
            category,
            source,
            status: OutcomeStatus::NotConfigured,
            http_status: None,
            error_message: None,
            attempts: 0,
        }
    }

    /// Whether the destination accepted the event.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == OutcomeStatus::Delivered
    }
}
