//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the acting player's id.
pub const PLAYER_ID_HEADER: &str = "x-player-id";

/// The player on whose behalf a request is made, taken from `X-Player-Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingPlayer(pub Uuid);

impl<S> FromRequestParts<S> for ActingPlayer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PLAYER_ID_HEADER)
            .ok_or(ApiError::MissingPlayerId)?;
        let raw = value.to_str().map_err(|_| ApiError::InvalidPlayerId)?;
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ApiError::InvalidPlayerId)
    }
}
