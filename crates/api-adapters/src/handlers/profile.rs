//! `/api/profile/*` and the public recent-users list.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRequest {
    avatar_url: String,
}

#[derive(Deserialize)]
pub struct EmailRequest {
    email: String,
}

#[derive(Deserialize)]
pub struct GameNameRequest {
    name: String,
}

/// `POST /api/profile/avatar`
pub async fn set_avatar(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    ApiJson(req): ApiJson<AvatarRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state.profile.set_avatar(&claims, &req.avatar_url).await?;
    Ok(Json(json!({
        "ok": true,
        "avatarUrl": user.avatar_url,
        "user": user,
    })))
}

/// `POST /api/profile/email` re-issues the token so the email claim stays
/// current.
pub async fn set_email(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    ApiJson(req): ApiJson<EmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let success = state.profile.set_email(&claims, &req.email).await?;
    Ok(Json(json!({ "token": success.token, "user": success.user })))
}

/// `POST /api/profile/gamename`
pub async fn set_game_name(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    ApiJson(req): ApiJson<GameNameRequest>,
) -> Result<Json<Value>, ApiError> {
    let success = state.profile.set_game_name(&claims, &req.name).await?;
    Ok(Json(json!({ "token": success.token, "user": success.user })))
}

/// `GET /api/users/recent`
pub async fn recent_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state.profile.recent().await?;
    Ok(Json(json!(users)))
}
