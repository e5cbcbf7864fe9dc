//! Commands for game sessions.

use mysterio_core::command::Command;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Command to generate a scenario and start a session on it.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Number of players to seat.
    pub player_count: usize,
    /// Requested difficulty tier, unparsed.
    pub difficulty: String,
    /// Cancels scenario generation when fired.
    pub cancellation: CancellationToken,
}

/// Command to seat one more player.
#[derive(Debug, Clone)]
pub struct JoinSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to join.
    pub session_id: Uuid,
}

/// Command to move a session to its next phase.
#[derive(Debug, Clone)]
pub struct AdvancePhase {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to advance.
    pub session_id: Uuid,
    /// The player asking. Must own the session.
    pub acting_player_id: Uuid,
}

/// Command to cast a vote.
#[derive(Debug, Clone)]
pub struct CastVote {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session voted in.
    pub session_id: Uuid,
    /// The player voting.
    pub voter_player_id: Uuid,
    /// The player accused.
    pub target_player_id: Uuid,
}

impl Command for CreateSession {
    fn command_type(&self) -> &'static str {
        "session.create_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        None
    }
}

impl Command for JoinSession {
    fn command_type(&self) -> &'static str {
        "session.join_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        Some(self.session_id)
    }
}

impl Command for AdvancePhase {
    fn command_type(&self) -> &'static str {
        "session.advance_phase"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        Some(self.session_id)
    }
}

impl Command for CastVote {
    fn command_type(&self) -> &'static str {
        "session.cast_vote"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn session_id(&self) -> Option<Uuid> {
        Some(self.session_id)
    }
}
