//! Error types for noteplex.

use thiserror::Error;

/// Result type alias using noteplex's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for noteplex operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Note not found by public identifier
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// Invitation hash does not resolve to any note settings
    #[error("Wrong invitation")]
    InvalidInvitation,

    /// Role mutation targeted a user outside the note's team
    #[error("User does not belong to Note's team")]
    NotInTeam,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Authentication failed or missing
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (authenticated but not authorized)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
