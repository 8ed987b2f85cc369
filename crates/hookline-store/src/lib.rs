//! PostgreSQL implementations of the Hookline storage traits.

pub mod pg_config_store;
pub mod pg_submission_store;

pub use pg_config_store::PgConfigStore;
pub use pg_submission_store::PgSubmissionStore;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

pub(crate) fn infrastructure(err: sqlx::Error) -> hookline_core::error::DomainError {
    hookline_core::error::DomainError::Infrastructure(err.to_string())
}
