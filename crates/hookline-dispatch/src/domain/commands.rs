//! Commands handled by the dispatch context.

use hookline_core::category::EventCategory;
use hookline_core::platform::Platform;
use hookline_core::store::DestinationMap;
use hookline_core::submission::Payload;
use uuid::Uuid;

/// Command to record a submission and, optionally, dispatch it immediately.
#[derive(Debug, Clone)]
pub struct RecordSubmission {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The kind of action submitted.
    pub category: EventCategory,
    /// The submitted form fields.
    pub payload: Payload,
    /// Whether to dispatch once recorded.
    pub dispatch: bool,
}

/// Command to replay recent submissions to the current destinations.
#[derive(Debug, Clone)]
pub struct ResendBackfill {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// How many days back from now to replay. Validated by the handler.
    pub lookback_days: i64,
}

/// Command to replace one platform's destination configuration wholesale.
#[derive(Debug, Clone)]
pub struct SaveDestinations {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The platform being configured.
    pub platform: Platform,
    /// The complete new configuration. Categories missing here are cleared.
    pub destinations: DestinationMap,
}
