//! Outbound payload shaping.
//!
//! Field names pass through unchanged. Context keys are added only when the
//! submission does not already carry a field with that name.

use chrono::SecondsFormat;
use hookline_core::category::EventCategory;
use hookline_core::submission::{Payload, Submission};
use serde_json::Value;

/// Key carrying the event category wire name.
pub const EVENT_CATEGORY_KEY: &str = "event_category";
/// Key carrying the submission id.
pub const SUBMISSION_ID_KEY: &str = "submission_id";
/// Key carrying the submission timestamp (RFC 3339).
pub const SUBMITTED_AT_KEY: &str = "submitted_at";

/// Body sent for an event that has no stored submission behind it: the
/// fields plus `event_category`. Stored submissions go through
/// `canonical_payload`, which adds the submission id and timestamp on top.
#[must_use]
pub fn event_payload(category: EventCategory, payload: &Payload) -> Value {
    Value::Object(with_category(category, payload))
}

/// Body sent for a stored submission. Identical for live and backfill
/// dispatch of the same submission.
#[must_use]
pub fn canonical_payload(submission: &Submission) -> Value {
    let mut body = with_category(submission.category, &submission.payload);
    body.entry(SUBMISSION_ID_KEY)
        .or_insert_with(|| Value::from(submission.id.to_string()));
    body.entry(SUBMITTED_AT_KEY).or_insert_with(|| {
        Value::from(
            submission
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        )
    });
    Value::Object(body)
}

fn with_category(category: EventCategory, payload: &Payload) -> Payload {
    let mut body = payload.clone();
    body.entry(EVENT_CATEGORY_KEY)
        .or_insert_with(|| Value::from(category.as_str()));
    body
}
