//! Query handlers for game sessions.
//!
//! Each query loads the session and returns a read-only view DTO. Nothing
//! here writes back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mysterio_core::error::DomainError;
use mysterio_core::repository::Repository;
use mysterio_scenario::{Phase, RoleId};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{GameSession, Player, PlayerAction, SessionStatus};
use crate::domain::projection::project;

/// One seated player as shown to everyone.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    /// The player identifier.
    pub player_id: Uuid,
    /// The role bound to the player.
    pub role_id: RoleId,
    /// Display name (the role's name).
    pub name: String,
}

/// Read-only summary of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Scenario title.
    pub title: String,
    /// Target play time in minutes.
    pub duration_minutes: u32,
    /// The player allowed to advance phases.
    pub owner_player_id: Uuid,
    /// Players in seat order.
    pub players: Vec<PlayerSummary>,
    /// Current phase tag.
    pub current_phase: Phase,
    /// Zero-based index of the current phase.
    pub phase_number: usize,
    /// Total number of phases.
    pub phase_count: usize,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// A newly seated player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    /// The session joined.
    pub session_id: Uuid,
    /// The new player's identifier.
    pub player_id: Uuid,
    /// The role bound to the new player.
    pub role_id: RoleId,
    /// Display name (the role's name).
    pub name: String,
    /// Zero-based join order.
    pub seat: usize,
}

/// The requesting player's own role.
#[derive(Debug, Clone, Serialize)]
pub struct RoleCard {
    /// Role identifier.
    pub role_id: RoleId,
    /// Role display name.
    pub name: String,
    /// Role description.
    pub description: String,
}

/// One of the requesting player's secrets.
#[derive(Debug, Clone, Serialize)]
pub struct SecretView {
    /// The role the secret is about, if any.
    pub target_role_id: Option<RoleId>,
    /// Secret text.
    pub content: String,
}

/// What one player sees of the current phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The requesting player.
    pub player_id: Uuid,
    /// Current phase tag.
    pub phase: Phase,
    /// Zero-based index of the current phase.
    pub phase_number: usize,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Public description.
    pub description: String,
    /// Public narrative text.
    pub public_text: String,
    /// Authored public actions.
    pub public_actions: Vec<String>,
    /// Hints for the player's role only.
    pub hints: Vec<String>,
    /// Actions the engine currently allows this player.
    pub available_actions: Vec<PlayerAction>,
    /// The player's role.
    pub role: RoleCard,
    /// The role's secrets. Only revealed during the first phase.
    pub secrets: Vec<SecretView>,
}

/// The outcome of a game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResultView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The scenario's solution.
    pub truth: String,
    /// The player with the most votes, `None` without votes.
    pub winner_id: Option<Uuid>,
    /// Display name of the winner.
    pub winner_name: Option<String>,
    /// Votes per target.
    pub vote_tally: BTreeMap<Uuid, usize>,
    /// Number of players who voted.
    pub total_votes: usize,
    /// Display name of every participant.
    pub player_names: BTreeMap<Uuid, String>,
}

pub(crate) fn session_view(session: &GameSession) -> SessionView {
    SessionView {
        session_id: session.id,
        title: session.scenario().meta.title.clone(),
        duration_minutes: session.scenario().meta.duration_minutes,
        owner_player_id: session.owner_player_id(),
        players: session
            .players_by_seat()
            .into_iter()
            .map(|player| PlayerSummary {
                player_id: player.id,
                role_id: player.role_id.clone(),
                name: session.display_name(player),
            })
            .collect(),
        current_phase: session.current_phase(),
        phase_number: session.phase_index(),
        phase_count: session.scenario().phases.len(),
        status: session.status(),
        created_at: session.created_at(),
    }
}

pub(crate) fn player_view(session: &GameSession, player: &Player) -> PlayerView {
    PlayerView {
        session_id: session.id,
        player_id: player.id,
        role_id: player.role_id.clone(),
        name: session.display_name(player),
        seat: player.seat,
    }
}

/// Retrieves a session summary by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no session exists for the ID.
pub async fn get_session_by_id(
    session_id: Uuid,
    repo: &dyn Repository<GameSession>,
) -> Result<SessionView, DomainError> {
    let session = repo.find_by_id(session_id).await?;
    Ok(session_view(&session))
}

/// Projects the current phase for `player_id`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session and
/// `DomainError::PlayerNotFound` if the player is not seated in it.
pub async fn get_phase_view(
    session_id: Uuid,
    player_id: Uuid,
    repo: &dyn Repository<GameSession>,
) -> Result<PhaseView, DomainError> {
    let session = repo.find_by_id(session_id).await?;
    let player = session.player(player_id)?;
    let role = session.role_of(player).ok_or_else(|| {
        DomainError::Infrastructure(format!("role `{}` missing from scenario", player.role_id))
    })?;

    let projection = project(session.current_content(), &player.role_id);
    let secrets = if session.phase_index() == 0 {
        role.secrets
            .iter()
            .map(|secret| SecretView {
                target_role_id: secret.target_role_id.clone(),
                content: secret.content.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(PhaseView {
        session_id,
        player_id,
        phase: projection.phase,
        phase_number: session.phase_index(),
        status: session.status(),
        description: projection.description,
        public_text: projection.public_text,
        public_actions: projection.public_actions,
        hints: projection.hints,
        available_actions: session.available_actions(player_id),
        role: RoleCard {
            role_id: role.id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
        },
        secrets,
    })
}

/// Tallies the votes and reveals the truth.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown session and
/// `DomainError::GameNotFinished` before the last phase is reached.
pub async fn get_game_result(
    session_id: Uuid,
    repo: &dyn Repository<GameSession>,
) -> Result<GameResultView, DomainError> {
    let session = repo.find_by_id(session_id).await?;
    session.ensure_result_available()?;

    let player_names: BTreeMap<Uuid, String> = session
        .players_by_seat()
        .into_iter()
        .map(|player| (player.id, session.display_name(player)))
        .collect();
    let winner_id = session.winner();
    let winner_name = winner_id.and_then(|id| player_names.get(&id).cloned());

    Ok(GameResultView {
        session_id,
        truth: session.scenario().truth.clone(),
        winner_id,
        winner_name,
        vote_tally: session.tally(),
        total_votes: session.votes().len(),
        player_names,
    })
}
