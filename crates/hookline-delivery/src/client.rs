//! Delivery client: a single destination with bounded retry.

use std::sync::Arc;

use hookline_core::transport::HttpTransport;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::policy::DeliveryPolicy;

/// Result of delivering one payload to one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Whether some attempt received a 2xx response.
    pub delivered: bool,
    /// Status of the last response received, if any.
    pub http_status: Option<u16>,
    /// Last error when not delivered.
    pub error_message: Option<String>,
    /// Attempts made. Zero when the URL was rejected before sending.
    pub attempts: u32,
}

/// Delivers JSON payloads with a per-attempt timeout and linear backoff.
///
/// Holds no state between calls beyond the shared transport.
#[derive(Clone)]
pub struct DeliveryClient {
    transport: Arc<dyn HttpTransport>,
    policy: DeliveryPolicy,
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl DeliveryClient {
    /// Creates a client over `transport` using `policy`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, policy: DeliveryPolicy) -> Self {
        Self { transport, policy }
    }

    /// The policy in effect.
    #[must_use]
    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    /// POSTs `payload` to `url`, retrying on timeout, connection failure and
    /// non-2xx responses until the attempt budget is spent.
    pub async fn deliver(&self, url: &str, payload: &Value) -> DeliveryReport {
        if let Err(reason) = check_url(url) {
            warn!(url, %reason, "rejecting destination url");
            return DeliveryReport {
                delivered: false,
                http_status: None,
                error_message: Some(reason),
                attempts: 0,
            };
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut http_status = None;
        let mut error_message = None;

        for attempt in 1..=max_attempts {
            match self
                .transport
                .post_json(url, payload, self.policy.timeout)
                .await
            {
                Ok(status) if (200..300).contains(&status) => {
                    debug!(url, status, attempt, "destination accepted payload");
                    return DeliveryReport {
                        delivered: true,
                        http_status: Some(status),
                        error_message: None,
                        attempts: attempt,
                    };
                }
                Ok(status) => {
                    http_status = Some(status);
                    error_message = Some(format!("HTTP {status}"));
                }
                Err(err) => {
                    http_status = None;
                    error_message = Some(err.to_string());
                }
            }

            if attempt < max_attempts {
                let delay = self.policy.delay_after(attempt);
                warn!(
                    url,
                    attempt,
                    error = error_message.as_deref().unwrap_or_default(),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "delivery attempt failed, retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(
            url,
            attempts = max_attempts,
            error = error_message.as_deref().unwrap_or_default(),
            "delivery failed after exhausting retries"
        );
        DeliveryReport {
            delivered: false,
            http_status,
            error_message,
            attempts: max_attempts,
        }
    }
}

fn check_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| format!("invalid destination url: {e}"))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        "http" | "https" => Err("destination url has no host".into()),
        other => Err(format!("unsupported destination scheme: {other}")),
    }
}
