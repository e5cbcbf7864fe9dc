//! Routes for game sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use mysterio_session::application::command_handlers::{self, VoteRecorded};
use mysterio_session::application::query_handlers::{
    self, GameResultView, PhaseView, PlayerView, SessionView,
};
use mysterio_session::domain::aggregates::PhaseTransition;
use mysterio_session::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::ActingPlayer;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Number of players to seat.
    pub player_count: usize,
    /// One of `easy`, `medium`, `hard`.
    pub difficulty: String,
}

/// Request body for POST /{session_id}/votes.
#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    /// The player accused.
    pub target_player_id: Uuid,
}

/// POST /
#[instrument(skip(state, request), fields(player_count = request.player_count))]
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let command = commands::CreateSession {
        correlation_id: Uuid::new_v4(),
        player_count: request.player_count,
        difficulty: request.difficulty,
        cancellation: state.shutdown.child_token(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_session command");

    let view = command_handlers::handle_create_session(
        &command,
        &state.scenarios,
        state.clock.as_ref(),
        &*state.sessions,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = query_handlers::get_session_by_id(session_id, &*state.sessions).await?;
    Ok(Json(view))
}

/// POST /{session_id}/players
#[instrument(skip(state))]
async fn join_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<(StatusCode, Json<PlayerView>), ApiError> {
    let command = commands::JoinSession {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling join_session command");

    let player =
        command_handlers::handle_join_session(&command, &state.locks, &*state.sessions).await?;

    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /{session_id}/phase
#[instrument(skip(state, player), fields(player_id = %player.0))]
async fn get_phase(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    player: ActingPlayer,
) -> Result<Json<PhaseView>, ApiError> {
    let view = query_handlers::get_phase_view(session_id, player.0, &*state.sessions).await?;
    Ok(Json(view))
}

/// POST /{session_id}/phase/advance
#[instrument(skip(state, player), fields(player_id = %player.0))]
async fn advance_phase(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    player: ActingPlayer,
) -> Result<Json<PhaseTransition>, ApiError> {
    let command = commands::AdvancePhase {
        correlation_id: Uuid::new_v4(),
        session_id,
        acting_player_id: player.0,
    };

    info!(correlation_id = %command.correlation_id, "handling advance_phase command");

    let transition =
        command_handlers::handle_advance_phase(&command, &state.locks, &*state.sessions).await?;

    Ok(Json(transition))
}

/// POST /{session_id}/votes
#[instrument(skip(state, player, request), fields(player_id = %player.0))]
async fn cast_vote(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    player: ActingPlayer,
    Json(request): Json<CastVoteRequest>,
) -> Result<Json<VoteRecorded>, ApiError> {
    let command = commands::CastVote {
        correlation_id: Uuid::new_v4(),
        session_id,
        voter_player_id: player.0,
        target_player_id: request.target_player_id,
    };

    info!(correlation_id = %command.correlation_id, "handling cast_vote command");

    let recorded =
        command_handlers::handle_cast_vote(&command, &state.locks, &*state.sessions).await?;

    Ok(Json(recorded))
}

/// GET /{session_id}/result
#[instrument(skip(state))]
async fn get_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GameResultView>, ApiError> {
    let result = query_handlers::get_game_result(session_id, &*state.sessions).await?;
    Ok(Json(result))
}

/// Returns the router for sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{session_id}", get(get_session))
        .route("/{session_id}/players", post(join_session))
        .route("/{session_id}/phase", get(get_phase))
        .route("/{session_id}/phase/advance", post(advance_phase))
        .route("/{session_id}/votes", post(cast_vote))
        .route("/{session_id}/result", get(get_result))
}
