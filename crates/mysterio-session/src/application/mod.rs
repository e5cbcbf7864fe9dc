//! Application layer: command and query handlers for game sessions.

pub mod command_handlers;
pub mod locks;
pub mod query_handlers;
