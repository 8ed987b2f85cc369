//! Event categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The kind of business action that produced a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// A visitor signed up for a service.
    ServiceSignup,
    /// A visitor asked to be called back about an eSIM plan.
    EsimCallback,
    /// A visitor signed up for an IPTV subscription.
    IptvSignup,
}

impl EventCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 3] = [Self::ServiceSignup, Self::EsimCallback, Self::IptvSignup];

    /// Wire name used in payloads, storage and routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServiceSignup => "service_signup",
            Self::EsimCallback => "esim_callback",
            Self::IptvSignup => "iptv_signup",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown event category: {s}")))
    }
}
