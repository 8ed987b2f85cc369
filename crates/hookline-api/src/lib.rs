//! Hookline API: HTTP surface for intake, destination administration,
//! backfill and signed platform callbacks.

pub mod config;
pub mod error;
pub mod routes;
pub mod signature;
pub mod state;
pub mod telemetry;
