//! Cross-cutting error types for Tally.
//!
//! Domain-specific errors (`DatabaseError`, `ConfigError`) live in their
//! respective crates and converge into `anyhow` in `tally-cli`.

use thiserror::Error;

/// Errors that can be raised by any Tally crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A link event was applied to a state that does not accept it.
    #[error("Invalid link transition: {event} from state {from}")]
    InvalidTransition { event: String, from: String },

    /// Data failed validation (labels, paths, state codes).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checklist file could not be read or written.
    #[error("Checklist I/O error at {path}: {source}")]
    ChecklistIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Checklist JSON is malformed.
    #[error("Checklist JSON error: {0}")]
    ChecklistJson(#[from] serde_json::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
