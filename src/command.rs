//! Slash commands embedded in chat text
//!
//! Prefixes are checked in order: `/priv`, `/name`, then the exact text
//! `/members`. Arguments are split on single spaces.

use crate::error::AppError;

const PRIVATE_PREFIX: &str = "/priv";
const RENAME_PREFIX: &str = "/name";
const MEMBERS_COMMAND: &str = "/members";

/// What a chat text asks the server to do
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// `/priv <user> <text...>`
    Private { recipient: String, text: String },
    /// `/name <new>`
    Rename { new_name: String },
    /// `/members`
    Members,
    /// Plain chat for the whole room
    Say(String),
}

impl Command {
    /// Classify a chat text
    ///
    /// Missing command arguments give the matching usage error.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        if text.starts_with(PRIVATE_PREFIX) {
            let mut parts = text.split(' ').skip(1);
            let recipient = parts.next().unwrap_or_default();
            let body = parts.collect::<Vec<_>>().join(" ");
            if recipient.is_empty() || body.is_empty() {
                return Err(AppError::PrivateUsage);
            }
            return Ok(Command::Private {
                recipient: recipient.to_string(),
                text: body,
            });
        }

        if text.starts_with(RENAME_PREFIX) {
            let new_name = text.split(' ').nth(1).unwrap_or_default();
            if new_name.is_empty() {
                return Err(AppError::RenameUsage);
            }
            return Ok(Command::Rename {
                new_name: new_name.to_string(),
            });
        }

        if text == MEMBERS_COMMAND {
            return Ok(Command::Members);
        }

        Ok(Command::Say(text.to_string()))
    }
}
