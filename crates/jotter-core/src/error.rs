//! Error types for jotter.

use thiserror::Error;

/// Result type alias using jotter's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jotter operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found, or present but owned by someone else
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Missing or unresolvable identity token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    /// NotFound for a note id. The message never says whether the note exists
    /// under another owner.
    pub fn note_not_found(id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("Note {} not found", id))
    }
}
