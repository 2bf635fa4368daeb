//! The central domain layer: models, port traits, and the error taxonomy
//! shared by every other crate in the workspace.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
