//! Route table and middleware assembly.

use std::path::PathBuf;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::set_verbose_errors;
use crate::handlers::{admin, auth, events, forum, players, profile};
use crate::metrics;
use crate::state::AppState;

pub struct RouterOptions {
    /// `*` or one concrete origin.
    pub cors_origin: String,
    /// Root of the statically served uploads tree.
    pub uploads_dir: PathBuf,
    /// Include failure detail in 5xx payloads (development only).
    pub verbose_errors: bool,
}

pub fn build_router(state: AppState, opts: RouterOptions) -> Router {
    set_verbose_errors(opts.verbose_errors);

    Router::new()
        .route("/api/health", get(players::health))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/login-game", post(auth::login_game))
        .route("/api/auth/me", get(auth::me))
        .route("/api/profile/avatar", post(profile::set_avatar))
        .route("/api/profile/email", post(profile::set_email))
        .route("/api/profile/gamename", post(profile::set_game_name))
        .route("/api/ranking/top", get(players::ranking_top))
        .route("/api/players/online", get(players::players_online))
        .route(
            "/api/forum/threads",
            get(forum::list_threads).post(forum::create_thread),
        )
        .route("/api/forum/threads/{id}", get(forum::get_thread))
        .route("/api/forum/threads/{id}/replies", post(forum::create_reply))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/{id}/admin", put(admin::set_admin_flag))
        .route("/api/users/recent", get(profile::recent_users))
        .route("/metrics", get(metrics::export))
        .nest_service("/api/uploads", ServeDir::new(&opts.uploads_dir))
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics::track,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&opts.cors_origin))
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let permissive = || {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods.clone())
            .allow_headers(Any)
            .max_age(Duration::from_secs(86_400))
    };
    if origin == "*" {
        return permissive();
    }
    match origin.parse::<HeaderValue>() {
        // A concrete origin allows credentialed requests, which `*` cannot.
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(methods.clone())
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(86_400)),
        Err(_) => {
            warn!(origin, "invalid CORS origin, falling back to permissive");
            permissive()
        }
    }
}
