//! Session error types

use thiserror::Error;

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session exists for the given id
    #[error("Session not found: {0}")]
    NotFound(String),

    /// JSON serialization error while encoding/decoding session state
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
