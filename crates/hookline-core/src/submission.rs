//! Submissions: recorded end-user actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::category::EventCategory;
use crate::error::DomainError;

/// Flat mapping of form field name to string or number value.
pub type Payload = Map<String, Value>;

/// One recorded end-user action. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Identifier assigned by the submission store.
    pub id: Uuid,
    /// Which kind of action this was.
    pub category: EventCategory,
    /// Form fields as submitted.
    pub payload: Payload,
    /// When the submission was recorded.
    pub created_at: DateTime<Utc>,
}

/// Checks that a payload is a non-empty flat object of strings and numbers.
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the first offending field.
pub fn validate_payload(payload: &Payload) -> Result<(), DomainError> {
    if payload.is_empty() {
        return Err(DomainError::Validation(
            "payload must contain at least one field".into(),
        ));
    }
    for (field, value) in payload {
        if field.trim().is_empty() {
            return Err(DomainError::Validation(
                "payload field names must not be blank".into(),
            ));
        }
        if !(value.is_string() || value.is_number()) {
            return Err(DomainError::Validation(format!(
                "payload field `{field}` must be a string or a number"
            )));
        }
    }
    Ok(())
}
