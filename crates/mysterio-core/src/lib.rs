//! Mysterio Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the scenario,
//! session, and storage crates depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod repository;
