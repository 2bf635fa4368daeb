//! Domain-error to HTTP mapping.
//!
//! Every failure becomes a structured `{"error": ...}` payload. In
//! production the 5xx family carries a generic message; in development the
//! underlying detail is included to aid debugging. Either way the detail
//! is logged server-side with full context.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use once_cell::sync::OnceCell;
use serde_json::json;
use tracing::error;

use domains::error::DomainError;

static VERBOSE_ERRORS: OnceCell<bool> = OnceCell::new();

/// Set once at router construction; `true` outside production.
pub fn set_verbose_errors(verbose: bool) {
    let _ = VERBOSE_ERRORS.set(verbose);
}

fn verbose_errors() -> bool {
    *VERBOSE_ERRORS.get().unwrap_or(&true)
}

/// The HTTP projection of a [`DomainError`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".into(),
            detail: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let (status, message, detail) = match &err {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            DomainError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".into(), None)
            }
            DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            DomainError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized".into(), None),
            DomainError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".into(), None),
            DomainError::NotFound(entity, _) => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
            }
            DomainError::RateLimited(_) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, try again later".into(),
                None,
            ),
            DomainError::Timeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Upstream timeout".into(),
                Some(err.to_string()),
            ),
            DomainError::Upstream(_) | DomainError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
                Some(err.to_string()),
            ),
        };
        Self { status, message, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = %self.status,
                detail = self.detail.as_deref().unwrap_or(&self.message),
                "request failed"
            );
        }
        let body = match self.detail.filter(|_| verbose_errors()) {
            Some(detail) => json!({ "error": self.message, "detail": detail }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
