//! Room struct definition
//!
//! Represents a named broadcast domain holding the members currently
//! connected to it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::member::Member;
use crate::message::ServerMessage;
use crate::types::{RoomName, SessionId};

/// Group chat room
///
/// Any number of members; membership is shared across connection tasks and
/// guarded by a lock that is never held while delivering messages.
#[derive(Debug)]
pub struct Room {
    /// Room name for identification
    pub name: RoomName,
    /// Current members: SessionId -> Member
    members: RwLock<HashMap<SessionId, Arc<Member>>>,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: RwLock::new(HashMap::new()),
        }
    }

    /// Add a member to the room (no-op if already present)
    pub fn join(&self, member: &Arc<Member>) {
        self.members
            .write()
            .entry(member.id)
            .or_insert_with(|| Arc::clone(member));
    }

    /// Remove a member from the room (no-op if absent)
    pub fn leave(&self, member: &Member) {
        self.members.write().remove(&member.id);
    }

    /// Deliver a message to every current member
    ///
    /// Delivery to a closed connection is dropped without affecting the others.
    pub fn broadcast(&self, msg: ServerMessage) {
        let recipients = self.snapshot();
        debug!("Broadcasting to {} members of {}", recipients.len(), self.name);
        for member in recipients {
            member.send(msg.clone());
        }
    }

    /// Display names of all named members, in no particular order
    pub fn list_members(&self) -> Vec<String> {
        self.members
            .read()
            .values()
            .filter_map(|member| member.name())
            .collect()
    }

    /// Find the member currently going by `name` (exact, case-sensitive)
    pub fn get_user_by_name(&self, name: &str) -> Option<Arc<Member>> {
        self.members
            .read()
            .values()
            .find(|member| member.has_name(name))
            .cloned()
    }

    /// Check if a session is a member of this room
    pub fn contains(&self, id: SessionId) -> bool {
        self.members.read().contains_key(&id)
    }

    /// Check whether anyone other than `id` is in the room
    pub fn has_members_besides(&self, id: SessionId) -> bool {
        self.members.read().keys().any(|member_id| *member_id != id)
    }

    /// Get the number of members in the room
    pub fn member_count(&self) -> usize {
        self.members.read().len()
    }

    fn snapshot(&self) -> Vec<Arc<Member>> {
        self.members.read().values().cloned().collect()
    }
}
