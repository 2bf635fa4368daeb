//! `/api/auth/*`: signup, the two login paths, and identity resolution.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use services::SignupInput;

use crate::error::ApiError;
use crate::extract::{ApiJson, ClientAddr, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    email: String,
    password: String,
    nickname: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct GameLoginRequest {
    username: String,
    password: String,
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<Json<Value>, ApiError> {
    state.signup_limiter.check(addr)?;
    let success = state
        .auth
        .signup(SignupInput {
            email: req.email,
            password: req.password,
            nickname: req.nickname,
            first_name: req.first_name,
            last_name: req.last_name,
            avatar_url: req.avatar_url,
        })
        .await?;
    Ok(Json(json!({ "token": success.token, "user": success.user })))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ClientAddr(addr): ClientAddr,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    state.login_limiter.check(addr)?;
    let success = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(json!({ "token": success.token, "user": success.user })))
}

/// `POST /api/auth/login-game`
pub async fn login_game(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GameLoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let success = state.auth.login_game(&req.username, &req.password).await?;
    Ok(Json(json!({ "token": success.token, "user": success.user })))
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.me(&claims).await?;
    Ok(Json(json!(user)))
}
