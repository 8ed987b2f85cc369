//! Scripted transport: an `HttpTransport` that never touches the network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hookline_core::transport::{HttpTransport, TransportError};
use serde_json::Value;

/// What the transport does for one request.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Answer with this HTTP status.
    Status(u16),
    /// Fail without a response.
    Error(TransportError),
}

#[derive(Debug)]
struct Script {
    queued: VecDeque<ScriptedResponse>,
    fallback: ScriptedResponse,
}

/// A transport answering from per-URL scripts and logging every call.
///
/// A URL with no script fails with a connection error. Queued responses are
/// consumed in order; once exhausted, the URL's fallback repeats.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    /// Create a transport with no scripted URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `status` for `url`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn always(self, url: &str, status: u16) -> Self {
        self.script(url, Vec::new(), ScriptedResponse::Status(status))
    }

    /// Always fail `url` with `error`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn always_fail(self, url: &str, error: TransportError) -> Self {
        self.script(url, Vec::new(), ScriptedResponse::Error(error))
    }

    /// Answer `queued` in order for `url`, then `fallback` forever.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn script(
        self,
        url: &str,
        queued: Vec<ScriptedResponse>,
        fallback: ScriptedResponse,
    ) -> Self {
        self.scripts.lock().unwrap().insert(
            url.to_owned(),
            Script {
                queued: queued.into(),
                fallback,
            },
        );
        self
    }

    /// Returns every `(url, body)` posted so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made to `url`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        _timeout: Duration,
    ) -> Result<u16, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_owned(), body.clone()));

        let response = match self.scripts.lock().unwrap().get_mut(url) {
            Some(script) => script
                .queued
                .pop_front()
                .unwrap_or_else(|| script.fallback.clone()),
            None => ScriptedResponse::Error(TransportError::Connect(format!("no route to {url}"))),
        };

        match response {
            ScriptedResponse::Status(status) => Ok(status),
            ScriptedResponse::Error(error) => Err(error),
        }
    }
}
