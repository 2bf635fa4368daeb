//! `/api/admin/*`: user listing and admin-flag toggling, gate-protected.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use domains::models::{AdminUserRow, PublicUser};

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleAdminRequest {
    #[serde(default)]
    is_admin: bool,
}

/// `GET /api/admin/users`
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<AdminUserRow>>, ApiError> {
    Ok(Json(state.profile.list_users(&claims).await?))
}

/// `PUT /api/admin/users/{id}/admin`
pub async fn set_admin_flag(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ToggleAdminRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .profile
        .set_admin_flag(&claims, &id, req.is_admin)
        .await?;
    Ok(Json(user))
}
