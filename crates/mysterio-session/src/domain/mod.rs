//! Domain layer for game sessions.

pub mod aggregates;
pub mod commands;
pub mod projection;
