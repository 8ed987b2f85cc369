//! Hookline Core: shared domain types and seams.
//!
//! This crate defines the event categories, platforms, submissions and
//! dispatch outcomes that every other crate speaks, together with the async
//! traits that separate the engine from storage and outbound HTTP. It
//! contains no infrastructure code.

pub mod category;
pub mod clock;
pub mod error;
pub mod outcome;
pub mod platform;
pub mod store;
pub mod submission;
pub mod transport;
