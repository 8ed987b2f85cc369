//! Delivery retry policy.

use std::time::Duration;

/// Timeout and retry settings for a single destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Total attempts, including the first. Never less than one.
    pub max_attempts: u32,
    /// Linear backoff base: the wait after attempt `n` is `backoff * n`.
    pub backoff: Duration,
}

impl DeliveryPolicy {
    /// Wait before the attempt following `completed_attempts`.
    #[must_use]
    pub fn delay_after(&self, completed_attempts: u32) -> Duration {
        self.backoff.saturating_mul(completed_attempts)
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}
