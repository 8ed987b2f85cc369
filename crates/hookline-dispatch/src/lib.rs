//! Hookline Dispatch: forwarding business events to automation platforms.
//!
//! Live submissions and on-demand backfills both converge on
//! `DispatchEngine`, which fans one event out to every configured platform
//! and leaves per-destination retry to the delivery client.

pub mod application;
pub mod domain;
