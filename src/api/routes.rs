//! API route handlers.
//!
//! All endpoints return JSON. The data store is shared via
//! `Arc<dyn RoundStore>`, so handlers stay independent of the
//! concrete SQLite implementation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::handicap;
use crate::storage::RoundStore;
use crate::types::{HandicapHistoryPoint, NewPlayer, NewRound, Player, Round, TrackerError};

pub type AppState = Arc<dyn RoundStore>;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Wrapper translating domain errors into HTTP responses.
#[derive(Debug)]
pub struct ApiError(TrackerError);

impl From<TrackerError> for ApiError {
    fn from(e: TrackerError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TrackerError::PlayerNotFound(_) | TrackerError::RoundNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            TrackerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TrackerError::Storage(_) | TrackerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A round as shown in tables: the stored fields plus its
/// differential, rounded to one decimal for display.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    #[serde(flatten)]
    pub round: Round,
    pub differential: f64,
}

impl From<Round> for RoundView {
    fn from(round: Round) -> Self {
        let differential = handicap::round_to_tenth(handicap::differential(&round));
        RoundView {
            round,
            differential,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandicapResponse {
    pub player_id: String,
    /// Current handicap index; `0.0` means "not enough data yet",
    /// not a failure.
    pub handicap: f64,
    pub round_count: usize,
}

// ---------------------------------------------------------------------------
// Player handlers
// ---------------------------------------------------------------------------

/// POST /api/players
pub async fn create_player(
    State(store): State<AppState>,
    Json(new): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = store.create_player(new).await?;
    info!(player_id = %player.id, name = %player.name, "Player registered");
    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /api/players
pub async fn list_players(
    State(store): State<AppState>,
) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(store.list_players().await?))
}

/// GET /api/players/:id
pub async fn get_player(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(store.get_player(&id).await?))
}

/// DELETE /api/players/:id
pub async fn delete_player(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    store.delete_player(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Round handlers
// ---------------------------------------------------------------------------

/// POST /api/rounds
pub async fn create_round(
    State(store): State<AppState>,
    Json(new): Json<NewRound>,
) -> Result<(StatusCode, Json<Round>), ApiError> {
    let round = store.create_round(new).await?;
    info!(round_id = %round.id, player_id = %round.player_id, "Round recorded");
    Ok((StatusCode::CREATED, Json(round)))
}

/// GET /api/rounds/:id
pub async fn get_round(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Round>, ApiError> {
    Ok(Json(store.get_round(&id).await?))
}

/// DELETE /api/rounds/:id
pub async fn delete_round(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    store.delete_round(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/players/:id/rounds
pub async fn list_player_rounds(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RoundView>>, ApiError> {
    store.get_player(&id).await?;
    let rounds = store.rounds_for_player(&id).await?;
    Ok(Json(rounds.into_iter().map(RoundView::from).collect()))
}

// ---------------------------------------------------------------------------
// Handicap handlers
// ---------------------------------------------------------------------------

/// GET /api/players/:id/handicap
pub async fn get_handicap(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HandicapResponse>, ApiError> {
    let player = store.get_player(&id).await?;
    let rounds = store.rounds_for_player(&id).await?;
    Ok(Json(HandicapResponse {
        player_id: player.id,
        handicap: handicap::handicap_index(&rounds),
        round_count: rounds.len(),
    }))
}

/// GET /api/players/:id/handicap-history
pub async fn get_handicap_history(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HandicapHistoryPoint>>, ApiError> {
    store.get_player(&id).await?;
    let rounds = store.rounds_for_player(&id).await?;
    Ok(Json(handicap::handicap_history(&rounds)))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
