//! Room member and its send capability
//!
//! A `Member` is the part of a chat session its room can see: identity,
//! display name, and the channel feeding the connection's writer task.

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::debug;

use crate::message::ServerMessage;
use crate::types::SessionId;

/// Best-effort send capability for one connection
///
/// `send` never fails visibly: if the connection is gone the message is dropped.
#[derive(Debug, Clone)]
pub struct Outbound {
    sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Outbound {
    /// Create a send capability and the receiver drained by the writer task
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queue a message for this connection, discarding it if the connection closed
    pub fn send(&self, msg: ServerMessage) {
        if self.sender.send(msg).is_err() {
            debug!("Dropping message for closed connection");
        }
    }

    /// Handle that does not keep the connection's writer alive
    pub fn downgrade(&self) -> WeakOutbound {
        WeakOutbound {
            sender: self.sender.downgrade(),
        }
    }
}

/// Send capability for background work that may outlive its session
///
/// Once the session is gone, `send` drops the message.
#[derive(Debug, Clone)]
pub struct WeakOutbound {
    sender: mpsc::WeakUnboundedSender<ServerMessage>,
}

impl WeakOutbound {
    pub fn send(&self, msg: ServerMessage) {
        match self.sender.upgrade() {
            Some(sender) => Outbound { sender }.send(msg),
            None => debug!("Dropping message for ended session"),
        }
    }
}

/// Connected member information
///
/// Holds the session's unique ID, its display name (None before join),
/// and its outbound channel.
#[derive(Debug)]
pub struct Member {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Display name (None before join)
    name: RwLock<Option<String>>,
    /// Server → Client message channel
    outbound: Outbound,
}

impl Member {
    /// Create a new member with the given ID and send capability
    pub fn new(id: SessionId, outbound: Outbound) -> Self {
        Self {
            id,
            name: RwLock::new(None),
            outbound,
        }
    }

    /// Send a message to this member
    pub fn send(&self, msg: ServerMessage) {
        self.outbound.send(msg);
    }

    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    /// Current display name, if set
    pub fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    /// Display name as interpolated into messages
    ///
    /// Returns the empty string when no name is set.
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_default()
    }

    /// Check whether this member currently goes by `name`
    pub fn has_name(&self, name: &str) -> bool {
        self.name.read().as_deref() == Some(name)
    }

    /// Replace the display name, returning the previous one
    pub fn set_name(&self, name: String) -> Option<String> {
        self.name.write().replace(name)
    }
}
