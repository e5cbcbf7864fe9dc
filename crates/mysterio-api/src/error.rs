//! Mysterio API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mysterio_core::error::DomainError;
use mysterio_scenario::SchemaDefinitionError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scenario-schema definition could not be loaded.
    #[error("scenario schema error: {0}")]
    Schema(#[from] SchemaDefinitionError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error: a domain failure, or a request without a usable
/// acting-player header.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Any failure reported by the engine.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The `X-Player-Id` header is absent.
    #[error("the X-Player-Id header is required")]
    MissingPlayerId,

    /// The `X-Player-Id` header is not a UUID.
    #[error("the X-Player-Id header must be a UUID")]
    InvalidPlayerId,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        let domain = match self {
            ApiError::MissingPlayerId => return (StatusCode::BAD_REQUEST, "missing_player_id"),
            ApiError::InvalidPlayerId => return (StatusCode::BAD_REQUEST, "invalid_player_id"),
            ApiError::Domain(err) => err,
        };
        match domain {
            DomainError::AggregateNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::PlayerNotFound(_) => (StatusCode::NOT_FOUND, "player_not_found"),
            DomainError::Unauthorized(_) => (StatusCode::FORBIDDEN, "unauthorized"),
            DomainError::InvalidPhase(_) => (StatusCode::CONFLICT, "invalid_phase"),
            DomainError::AlreadyVoted(_) => (StatusCode::CONFLICT, "already_voted"),
            DomainError::GameNotFinished => (StatusCode::CONFLICT, "game_not_finished"),
            DomainError::SessionFull(_) => (StatusCode::CONFLICT, "session_full"),
            DomainError::InvalidPlayerCount { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_player_count")
            }
            DomainError::InvalidDifficulty(_) => (StatusCode::BAD_REQUEST, "invalid_difficulty"),
            DomainError::InvalidTarget(_) => (StatusCode::BAD_REQUEST, "invalid_target"),
            DomainError::SchemaViolation { .. } => (StatusCode::BAD_GATEWAY, "scenario_schema_error"),
            DomainError::InsufficientRoles { .. } => (StatusCode::BAD_GATEWAY, "insufficient_roles"),
            DomainError::GenerationFailed(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
            DomainError::GenerationTimedOut(_) => {
                (StatusCode::GATEWAY_TIMEOUT, "generation_timed_out")
            }
            DomainError::GenerationCancelled => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_cancelled")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = error_code, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
