//! # DomainError
//!
//! Centralized error taxonomy for the Aethelgard back end.
//! Every failure that crosses a crate boundary is one of these kinds;
//! the API layer owns the mapping to HTTP status codes.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed or missing required input. Client-fixable, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication failure. Deliberately carries no detail so that an
    /// unknown identity and a wrong password are indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Uniqueness violation (duplicate email or nickname at signup).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, invalid, or expired session token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Valid token, insufficient privilege.
    #[error("forbidden")]
    Forbidden,

    /// Referenced entity does not exist.
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Client exceeded a request-budget window.
    #[error("too many requests: {0}")]
    RateLimited(String),

    /// An external call exceeded its deadline.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// The game database (or another external collaborator) failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Infrastructure failure inside this process (I/O, serialization).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for domain logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Internal(err.to_string())
    }
}
