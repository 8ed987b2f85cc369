//! Application layer: dispatch orchestration and command/query handlers.

pub mod admin;
pub mod backfill;
pub mod dispatch;
pub mod intake;
pub mod runs;
