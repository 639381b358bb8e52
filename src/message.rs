//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Every frame is a flat
//! object whose `type` field selects the variant.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name attached to chat messages generated by the server itself
pub const SERVER_NAME: &str = "Server";

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with kebab-case naming.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Take a display name and enter the room
    Join { name: String },
    /// Chat text, possibly a slash command
    Chat { text: String },
    /// Ask the server for a joke
    GetJoke,
}

/// Just the discriminant, read before the full message
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
}

impl ClientMessage {
    const KNOWN_TYPES: [&'static str; 3] = ["join", "chat", "get-joke"];

    /// Parse a raw text frame
    ///
    /// Invalid JSON, a missing `type`, or missing fields give `MalformedFrame`;
    /// a `type` outside the protocol gives `UnrecognizedMessageType`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let envelope = Envelope::deserialize(&value)?;
        if !Self::KNOWN_TYPES.contains(&envelope.kind.as_str()) {
            return Err(AppError::UnrecognizedMessageType(envelope.kind));
        }
        Ok(Self::deserialize(value)?)
    }
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with lowercase naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Chat text attributed to a sender (a member, "Server", or "Private from ...")
    Chat { name: String, text: String },
    /// Informational notice about joins, leaves and renames
    Note { text: String },
}

impl ServerMessage {
    /// Chat message from the server itself
    pub fn server_chat(text: impl Into<String>) -> Self {
        ServerMessage::Chat {
            name: SERVER_NAME.to_string(),
            text: text.into(),
        }
    }

    pub fn note(text: impl Into<String>) -> Self {
        ServerMessage::Note { text: text.into() }
    }
}

/// Convert AppError to a corrective chat message for the requester
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        match err {
            AppError::RenameUsage
            | AppError::PrivateUsage
            | AppError::NameTaken(_)
            | AppError::UserNotFound(_) => ServerMessage::server_chat(err.to_string()),
            // Fatal errors are not typically converted (connection closes)
            _ => ServerMessage::server_chat("Internal error"),
        }
    }
}
