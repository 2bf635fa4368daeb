//! # api-adapters
//!
//! The HTTP boundary: axum router, handlers, extractors, the domain-error
//! to status-code mapping, and request metrics. Everything is behind the
//! `web-axum` feature so alternative fronts can reuse the lower crates.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod metrics;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use router::{build_router, RouterOptions};
#[cfg(feature = "web-axum")]
pub use state::AppState;
