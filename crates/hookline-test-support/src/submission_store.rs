//! Test submission stores: `SubmissionStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hookline_core::category::EventCategory;
use hookline_core::error::DomainError;
use hookline_core::store::SubmissionStore;
use hookline_core::submission::{Payload, Submission};
use uuid::Uuid;

/// A submission store held in memory. Records every range query so tests can
/// assert whether the store was consulted.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    submissions: Mutex<Vec<Submission>>,
    queries: Mutex<Vec<(EventCategory, DateTime<Utc>, DateTime<Utc>)>>,
}

impl InMemorySubmissionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a submission directly, bypassing `append`. Returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed(
        &self,
        category: EventCategory,
        payload: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let payload = payload.as_object().cloned().unwrap_or_default();
        self.submissions.lock().unwrap().push(Submission {
            id,
            category,
            payload,
            created_at,
        });
        id
    }

    /// Returns a snapshot of all stored submissions, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Returns every `(category, from, to)` passed to `list_between`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn queries(&self) -> Vec<(EventCategory, DateTime<Utc>, DateTime<Utc>)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn append(
        &self,
        category: EventCategory,
        payload: Payload,
        created_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError> {
        let submission = Submission {
            id: Uuid::new_v4(),
            category,
            payload,
            created_at,
        };
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(submission)
    }

    async fn list_between(
        &self,
        category: EventCategory,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>, DomainError> {
        self.queries.lock().unwrap().push((category, from, to));
        let mut matching: Vec<Submission> = self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.category == category && s.created_at >= from && s.created_at <= to)
            .cloned()
            .collect();
        matching.sort_by_key(|s| (s.created_at, s.id));
        Ok(matching)
    }
}

/// A submission store that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingSubmissionStore;

#[async_trait]
impl SubmissionStore for FailingSubmissionStore {
    async fn append(
        &self,
        _category: EventCategory,
        _payload: Payload,
        _created_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_between(
        &self,
        _category: EventCategory,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<Submission>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
