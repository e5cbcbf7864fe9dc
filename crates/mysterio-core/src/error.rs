//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Every variant is a distinct, terminal outcome for the calling request;
/// nothing in the engine retries on any of them.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A session was not found.
    #[error("session not found: {0}")]
    AggregateNotFound(Uuid),

    /// The player is not a participant of the session.
    #[error("player not found: {0}")]
    PlayerNotFound(Uuid),

    /// A non-owner attempted an owner-only action.
    #[error("player {0} is not allowed to perform this action")]
    Unauthorized(Uuid),

    /// The action is not valid in the session's current phase or status.
    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    /// The player has already cast their vote.
    #[error("player {0} has already voted")]
    AlreadyVoted(Uuid),

    /// The result was requested before the last phase was reached.
    #[error("game not finished")]
    GameNotFinished,

    /// The requested player count is outside the supported range.
    #[error("invalid player count {requested}: must be between {min} and {max}")]
    InvalidPlayerCount {
        /// The requested player count.
        requested: usize,
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },

    /// The difficulty is not one of the supported tiers.
    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),

    /// The vote target is not a participant of the session.
    #[error("invalid vote target: {0}")]
    InvalidTarget(Uuid),

    /// Every role of the session's scenario is already taken.
    #[error("session {0} has no free role left")]
    SessionFull(Uuid),

    /// The scenario declares fewer roles than players requested.
    #[error("scenario has {available} roles but {requested} players were requested")]
    InsufficientRoles {
        /// The requested player count.
        requested: usize,
        /// Roles declared by the scenario.
        available: usize,
    },

    /// Generated scenario content does not conform to the scenario schema.
    #[error("scenario schema violation at {path}: {reason}")]
    SchemaViolation {
        /// Location of the offending value within the document.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The scenario generator reported a failure.
    #[error("scenario generation failed: {0}")]
    GenerationFailed(String),

    /// The scenario generator did not answer within its time box.
    #[error("scenario generation timed out after {0} ms")]
    GenerationTimedOut(u64),

    /// The caller cancelled while the scenario was being generated.
    #[error("scenario generation cancelled")]
    GenerationCancelled,

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
