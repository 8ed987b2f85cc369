//! Record-and-dispatch intake for new submissions.

use hookline_core::clock::Clock;
use hookline_core::error::DomainError;
use hookline_core::outcome::{DispatchOutcome, DispatchSource};
use hookline_core::store::SubmissionStore;
use hookline_core::submission::{Submission, validate_payload};
use tracing::{info, warn};

use crate::application::dispatch::DispatchEngine;
use crate::domain::commands::RecordSubmission;

/// What happened to a newly recorded submission.
#[derive(Debug, Clone)]
pub struct IntakeReceipt {
    /// The stored submission.
    pub submission: Submission,
    /// Per-platform outcomes. Empty when dispatch was not requested or could
    /// not run.
    pub outcomes: Vec<DispatchOutcome>,
    /// Why dispatch could not run, if it could not.
    pub dispatch_error: Option<String>,
}

/// Handles the `RecordSubmission` command: validates the payload, persists
/// the submission, then dispatches it live if requested.
///
/// Dispatch only starts after the submission is stored, and a dispatch
/// failure never undoes the stored record.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a malformed payload and
/// `DomainError::Infrastructure` if the submission cannot be stored.
pub async fn handle_record_submission(
    command: &RecordSubmission,
    clock: &dyn Clock,
    store: &dyn SubmissionStore,
    engine: &DispatchEngine,
) -> Result<IntakeReceipt, DomainError> {
    validate_payload(&command.payload)?;

    let submission = store
        .append(command.category, command.payload.clone(), clock.now())
        .await?;
    info!(
        correlation_id = %command.correlation_id,
        submission_id = %submission.id,
        category = %submission.category,
        "submission recorded"
    );

    if !command.dispatch {
        return Ok(IntakeReceipt {
            submission,
            outcomes: Vec::new(),
            dispatch_error: None,
        });
    }

    match engine
        .dispatch_submission(&submission, DispatchSource::Live)
        .await
    {
        Ok(outcomes) => Ok(IntakeReceipt {
            submission,
            outcomes,
            dispatch_error: None,
        }),
        Err(err) => {
            warn!(submission_id = %submission.id, error = %err, "live dispatch could not run");
            Ok(IntakeReceipt {
                submission,
                outcomes: Vec::new(),
                dispatch_error: Some(err.to_string()),
            })
        }
    }
}
