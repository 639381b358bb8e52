//! Room registry
//!
//! Maps room names to rooms. Rooms are created on first reference and live
//! as long as the registry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::room::Room;
use crate::types::RoomName;

/// Name → Room mapping shared by all connections
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomName, Arc<Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the room called `name`, creating it if needed
    ///
    /// Concurrent first lookups of the same name all receive the same room.
    pub fn get(&self, name: &RoomName) -> Arc<Room> {
        if let Some(room) = self.rooms.get(name) {
            return Arc::clone(room.value());
        }

        let room = self.rooms.entry(name.clone()).or_insert_with(|| {
            info!("Room {} created", name);
            Arc::new(Room::new(name.clone()))
        });
        Arc::clone(room.value())
    }

    /// Get the number of rooms created so far
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
