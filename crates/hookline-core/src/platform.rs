//! Automation platforms that receive dispatched events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One external automation integration. Each platform carries its own,
/// independent set of destination URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Zapier catch hooks.
    Zapier,
    /// Make (formerly Integromat) custom webhooks.
    Make,
}

impl Platform {
    /// Every platform, in declaration order.
    pub const ALL: [Self; 2] = [Self::Zapier, Self::Make];

    /// Wire name used in storage and routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zapier => "zapier",
            Self::Make => "make",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown platform: {s}")))
    }
}
