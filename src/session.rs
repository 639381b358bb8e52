//! Chat session implementation
//!
//! One `ChatSession` per connection. It parses inbound frames, keeps the
//! display name, and routes the results to its room or to single members.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command::Command;
use crate::error::AppError;
use crate::joke::JokeSource;
use crate::member::{Member, Outbound};
use crate::message::{ClientMessage, ServerMessage};
use crate::registry::RoomRegistry;
use crate::room::Room;
use crate::types::{RoomName, SessionId};

/// Sent in place of a joke when the fetch fails
pub const JOKE_FAILURE_TEXT: &str = "Sorry, I couldn't fetch a joke at the moment.";

/// Sent for `/members` when nobody else is in the room
pub const NO_OTHER_MEMBERS_TEXT: &str = "No other members in the room.";

/// Server-side state of one client connection
///
/// Bound to a single room for its whole life. The session only enters the
/// room's member set once a join message arrives.
pub struct ChatSession {
    member: Arc<Member>,
    room: Arc<Room>,
    jokes: Arc<dyn JokeSource>,
}

impl ChatSession {
    /// Create a session for a connection to `room_name`
    pub fn new(
        outbound: Outbound,
        room_name: &RoomName,
        registry: &RoomRegistry,
        jokes: Arc<dyn JokeSource>,
    ) -> Self {
        let member = Arc::new(Member::new(SessionId::new(), outbound));
        let room = registry.get(room_name);
        debug!("Session {} created in {}", member.id, room.name);
        Self {
            member,
            room,
            jokes,
        }
    }

    pub fn id(&self) -> SessionId {
        self.member.id
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Current display name, if the session has joined
    pub fn name(&self) -> Option<String> {
        self.member.name()
    }

    /// Process a single inbound frame
    ///
    /// Malformed frames and unknown message types are returned to the caller;
    /// command mistakes are answered to this session only.
    pub fn handle_message(&self, raw: &str) -> Result<(), AppError> {
        match ClientMessage::parse(raw)? {
            ClientMessage::Join { name } => self.handle_join(name),
            ClientMessage::Chat { text } => self.handle_chat_text(&text),
            ClientMessage::GetJoke => self.handle_get_joke(),
        }
        Ok(())
    }

    /// Connection closed: leave the room and announce it
    pub fn handle_close(&self) {
        self.room.leave(&self.member);
        info!("Session {} left room {}", self.member.id, self.room.name);
        self.room.broadcast(ServerMessage::note(format!(
            "{} left {}.",
            self.member.display_name(),
            self.room.name
        )));
    }

    /// Handle join: take the name, enter the room, announce it
    fn handle_join(&self, name: String) {
        info!("Session {} joined room {} as '{}'", self.member.id, self.room.name, name);
        self.member.set_name(name.clone());
        self.room.join(&self.member);
        self.room.broadcast(ServerMessage::note(format!(
            "{} joined \"{}\".",
            name, self.room.name
        )));
    }

    /// Handle chat text, which may carry a slash command
    fn handle_chat_text(&self, text: &str) {
        let result = match Command::parse(text) {
            Ok(Command::Private { recipient, text }) => self.handle_private(&recipient, text),
            Ok(Command::Rename { new_name }) => self.handle_rename(new_name),
            Ok(Command::Members) => {
                self.send_members();
                Ok(())
            }
            Ok(Command::Say(text)) => {
                self.handle_chat(text);
                Ok(())
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            debug!("Command from {} rejected: {}", self.member.id, e);
            self.member.send(e.into());
        }
    }

    /// Handle plain chat: broadcast to the whole room
    fn handle_chat(&self, text: String) {
        self.room.broadcast(ServerMessage::Chat {
            name: self.member.display_name(),
            text,
        });
    }

    /// Handle `/name`: change the display name if no other member holds it
    fn handle_rename(&self, new_name: String) -> Result<(), AppError> {
        if let Some(holder) = self.room.get_user_by_name(&new_name) {
            if holder.id != self.member.id {
                return Err(AppError::NameTaken(new_name));
            }
        }

        let old_name = self.member.set_name(new_name.clone()).unwrap_or_default();
        info!("Session {} renamed '{}' -> '{}'", self.member.id, old_name, new_name);
        self.room.broadcast(ServerMessage::note(format!(
            "{} changed the name to {}.",
            old_name, new_name
        )));
        Ok(())
    }

    /// Handle `/priv`: deliver to the recipient only, confirm to the sender
    fn handle_private(&self, recipient_name: &str, text: String) -> Result<(), AppError> {
        let Some(recipient) = self.room.get_user_by_name(recipient_name) else {
            return Err(AppError::UserNotFound(recipient_name.to_string()));
        };

        recipient.send(ServerMessage::Chat {
            name: format!("Private from {}", self.member.display_name()),
            text,
        });
        self.member.send(ServerMessage::server_chat(format!(
            "Private message sent to {}",
            recipient_name
        )));
        Ok(())
    }

    /// Handle `/members`: list the room to the requester
    fn send_members(&self) {
        let text = if self.room.has_members_besides(self.member.id) {
            format!("In room: {}", self.room.list_members().join(", "))
        } else {
            NO_OTHER_MEMBERS_TEXT.to_string()
        };
        self.member.send(ServerMessage::server_chat(text));
    }

    /// Handle get-joke: fetch in the background, reply to this session only
    fn handle_get_joke(&self) {
        let jokes = Arc::clone(&self.jokes);
        let outbound = self.member.outbound().downgrade();
        let id = self.member.id;

        tokio::spawn(async move {
            let text = match jokes.fetch().await {
                Ok(joke) => joke,
                Err(e) => {
                    warn!("Joke fetch for {} failed: {}", id, e);
                    JOKE_FAILURE_TEXT.to_string()
                }
            };
            outbound.send(ServerMessage::server_chat(text));
        });
    }
}
