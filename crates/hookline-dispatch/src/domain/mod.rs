//! Domain layer: commands, backfill accounting and payload shaping.

pub mod backfill;
pub mod commands;
pub mod payload;
