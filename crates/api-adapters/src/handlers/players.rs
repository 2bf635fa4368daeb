//! Public game-data projections: the leaderboard, online players, and the
//! health probe.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use domains::models::{OnlinePlayer, RankedCharacter};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RankingQuery {
    /// Parsed leniently: anything non-numeric falls back to the default,
    /// matching the original API's coercion.
    #[serde(default)]
    limit: Option<String>,
}

/// `GET /api/ranking/top?limit=N`
pub async fn ranking_top(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<Vec<RankedCharacter>>, ApiError> {
    let limit = query.limit.and_then(|raw| raw.parse::<u32>().ok());
    Ok(Json(state.ranking.top(limit).await?))
}

/// `GET /api/players/online`
pub async fn players_online(
    State(state): State<AppState>,
) -> Result<Json<Vec<OnlinePlayer>>, ApiError> {
    Ok(Json(state.ranking.online().await?))
}

/// `GET /api/health` pings the game database.
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.ranking.ping().await?;
    Ok(Json(json!({ "ok": true })))
}
