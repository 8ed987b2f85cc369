//! Service configuration read from the environment.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use hookline_core::platform::Platform;
use hookline_delivery::DeliveryPolicy;

use crate::error::AppError;

/// Shared secrets for inbound callbacks, by platform.
pub type CallbackSecrets = BTreeMap<Platform, String>;

/// Typed service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Connection pool size.
    pub max_connections: u32,
    /// Outbound delivery policy.
    pub delivery: DeliveryPolicy,
    /// Callback secrets. Platforms without one reject callbacks.
    pub callback_secrets: CallbackSecrets,
    /// OTLP collector endpoint. Export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl ServiceConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first missing or invalid
    /// variable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first missing or invalid
    /// variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("DATABASE_URL environment variable must be set".into())
            })?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse_or(&lookup, "PORT", 3000_u16)?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10_u32)?;

        let defaults = DeliveryPolicy::default();
        let timeout_secs = parse_or(
            &lookup,
            "DELIVERY_TIMEOUT_SECS",
            defaults.timeout.as_secs(),
        )?;
        let max_attempts = parse_or(&lookup, "DELIVERY_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(AppError::Config(
                "DELIVERY_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }
        let backoff_ms = parse_or(
            &lookup,
            "DELIVERY_BACKOFF_MS",
            u64::try_from(defaults.backoff.as_millis()).unwrap_or(u64::MAX),
        )?;

        let callback_secrets = Platform::ALL
            .into_iter()
            .filter_map(|platform| {
                lookup(secret_variable(platform).as_str())
                    .filter(|secret| !secret.is_empty())
                    .map(|secret| (platform, secret))
            })
            .collect();

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            delivery: DeliveryPolicy {
                timeout: Duration::from_secs(timeout_secs),
                max_attempts,
                backoff: Duration::from_millis(backoff_ms),
            },
            callback_secrets,
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

/// Environment variable holding the callback secret of `platform`.
#[must_use]
pub fn secret_variable(platform: Platform) -> String {
    format!("CALLBACK_SECRET_{}", platform.as_str().to_uppercase())
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{name} is invalid: {e}"))),
    }
}
