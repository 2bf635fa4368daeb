//! `/api/events`: publicly readable, admin-gated writes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use domains::models::{Event, EventPatch};
use services::events::NewEvent;

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateEventRequest {
    title: String,
    date: NaiveDate,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// `GET /api/events`
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.events.list().await?))
}

/// `POST /api/events`
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state
        .events
        .create(
            &claims,
            NewEvent {
                title: req.title,
                date: req.date,
                location: req.location,
                description: req.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `PUT /api/events/{id}`
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.events.update(&claims, &id, patch).await?))
}

/// `DELETE /api/events/{id}`
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.events.delete(&claims, &id).await?;
    Ok(Json(json!({ "ok": true })))
}
