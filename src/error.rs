//! Error types for the chat server
//!
//! Defines application-level errors and joke fetch errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// command errors (send a corrective message to the requester).
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Inbound frame is not a valid protocol message (fatal)
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    /// Well-formed frame with an unknown `type` (fatal)
    #[error("Unrecognized message type: {0}")]
    UnrecognizedMessageType(String),

    /// `/name` without a new name
    #[error("Usage: /name newName")]
    RenameUsage,

    /// `/priv` without a recipient or a message
    #[error("Usage: /priv username message")]
    PrivateUsage,

    /// Requested name is held by another member of the room
    #[error("Username \"{0}\" is already taken.")]
    NameTaken(String),

    /// Private message recipient is not in the room
    #[error("User {0} not found.")]
    UserNotFound(String),
}

impl AppError {
    /// Whether this error should terminate the connection
    ///
    /// Command errors are answered in-band and leave the connection open.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::RenameUsage
                | AppError::PrivateUsage
                | AppError::NameTaken(_)
                | AppError::UserNotFound(_)
        )
    }
}

/// Joke fetch errors
#[derive(Debug, Error)]
pub enum JokeError {
    /// Request failed or the response body was not the expected JSON
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
