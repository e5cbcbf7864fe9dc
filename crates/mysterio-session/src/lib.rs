//! Mysterio: session lifecycle engine.
//!
//! Creates sessions from validated scenarios, drives phase progression,
//! collects votes, tallies the result, and projects each phase down to what a
//! single player is allowed to see.

pub mod application;
pub mod domain;
