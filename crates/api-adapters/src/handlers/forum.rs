//! `/api/forum/*`: public reads, token-protected writes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use domains::models::{ForumReply, ForumThread, ThreadSummary};

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NewThreadRequest {
    title: String,
    content: String,
}

#[derive(Deserialize)]
pub struct NewReplyRequest {
    content: String,
}

/// `GET /api/forum/threads`
pub async fn list_threads(
    State(state): State<AppState>,
) -> Result<Json<Vec<ThreadSummary>>, ApiError> {
    Ok(Json(state.forum.list().await?))
}

/// `POST /api/forum/threads`
pub async fn create_thread(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    ApiJson(req): ApiJson<NewThreadRequest>,
) -> Result<(StatusCode, Json<ForumThread>), ApiError> {
    let thread = state.forum.create(&claims, &req.title, &req.content).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

/// `GET /api/forum/threads/{id}`
pub async fn get_thread(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ForumThread>, ApiError> {
    Ok(Json(state.forum.get(&id).await?))
}

/// `POST /api/forum/threads/{id}/replies`
pub async fn create_reply(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewReplyRequest>,
) -> Result<(StatusCode, Json<ForumReply>), ApiError> {
    let reply = state.forum.reply(&claims, &id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}
