//! Storage abstractions for destination configuration and submissions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::category::EventCategory;
use crate::error::DomainError;
use crate::platform::Platform;
use crate::submission::{Payload, Submission};

/// Destination URLs for one platform, keyed by category. Categories without a
/// configured URL are absent.
pub type DestinationMap = BTreeMap<EventCategory, String>;

/// Persists, per platform and category, the destination webhook URL.
///
/// Writes are atomic per `(platform, category)` entry and a `get` after a
/// `set` in the same process observes the new value.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns the URL configured for `platform` and `category`, if any.
    async fn get(
        &self,
        platform: Platform,
        category: EventCategory,
    ) -> Result<Option<String>, DomainError>;

    /// Returns every configured URL for `platform`.
    async fn get_all(&self, platform: Platform) -> Result<DestinationMap, DomainError>;

    /// Stores `url` for `platform` and `category`. A blank `url` clears the
    /// entry. URLs are not checked for reachability.
    async fn set(
        &self,
        platform: Platform,
        category: EventCategory,
        url: &str,
    ) -> Result<(), DomainError>;
}

/// Persists submissions and answers range queries over them.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Records a new submission and returns it with its assigned id.
    async fn append(
        &self,
        category: EventCategory,
        payload: Payload,
        created_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError>;

    /// Returns the submissions of `category` whose `created_at` lies in
    /// `[from, to]` (both inclusive), oldest first.
    async fn list_between(
        &self,
        category: EventCategory,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>, DomainError>;
}
