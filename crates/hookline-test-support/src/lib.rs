//! Shared test mocks and utilities for the Hookline event dispatch engine.

mod clock;
mod config_store;
mod submission_store;
mod transport;

pub use clock::FixedClock;
pub use config_store::{FailingConfigStore, InMemoryConfigStore};
pub use submission_store::{FailingSubmissionStore, InMemorySubmissionStore};
pub use transport::{ScriptedResponse, ScriptedTransport};
