//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Caller input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A backfill lookback fell outside the accepted range.
    #[error("lookback_days must be between {min} and {max}, got {requested}")]
    LookbackOutOfRange {
        /// The value the caller asked for.
        requested: i64,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
