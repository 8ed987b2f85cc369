//! Outbound HTTP abstraction.
//!
//! The delivery client owns retry and timeout policy; a transport performs
//! exactly one POST per call. Tests inject a scripted transport in place of
//! the network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a single POST produced no HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The attempt exceeded its timeout.
    #[error("request timed out")]
    Timeout,

    /// The destination could not be reached.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other request failure.
    #[error("request failed: {0}")]
    Other(String),
}

/// Performs a single JSON POST.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs `body` as JSON to `url` and returns the response status code.
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<u16, TransportError>;
}
