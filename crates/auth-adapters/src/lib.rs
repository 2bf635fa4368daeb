//! # auth-adapters
//!
//! Credential primitives: Argon2 hashing for site passwords and (behind
//! `auth-jwt`) the JWT session-token implementation.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2Hasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
