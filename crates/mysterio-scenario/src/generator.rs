//! Scenario generator interface.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::difficulty::Difficulty;

/// Failures reported by a scenario generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator backend could not be reached or refused the request.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The generator answered with something that is not a scenario document.
    #[error("generator returned malformed output: {0}")]
    Malformed(String),
}

/// Produces raw, untrusted scenario documents.
///
/// Implementations may be slow and non-deterministic. Callers must pass the
/// output through [`crate::validator::validate`] before using it; see
/// [`crate::source::ScenarioSource`].
#[async_trait]
pub trait ScenarioGenerator: Send + Sync {
    /// Generates a scenario document for `player_count` players.
    async fn generate(
        &self,
        player_count: usize,
        difficulty: Difficulty,
    ) -> Result<Value, GenerationError>;
}
