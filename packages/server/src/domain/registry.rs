//! Room registry: the single owner of every room.

use std::{collections::HashMap, sync::Arc};

use ludo_relay_shared::time::Clock;
use tokio::sync::Mutex;

use super::{Room, RoomError, RoomId, Timestamp};

/// Registry shared between connection tasks.
///
/// Holding the lock for a whole message-handling turn serializes every room
/// mutation and broadcast.
pub type SharedRoomRegistry = Arc<Mutex<RoomRegistry>>;

/// Process-wide mapping from room id to room, populated lazily.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    clock: Arc<dyn Clock>,
}

impl RoomRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: HashMap::new(),
            clock,
        }
    }

    /// Wrap the registry for sharing between tasks
    pub fn into_shared(self) -> SharedRoomRegistry {
        Arc::new(Mutex::new(self))
    }

    /// Look up a room by exact id, creating an empty one when asked to.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::NotFound`] when the room does not exist and
    /// `create_if_missing` is false. Nothing is created in that case.
    pub fn resolve(
        &mut self,
        room_id: &RoomId,
        create_if_missing: bool,
    ) -> Result<&mut Room, RoomError> {
        if !create_if_missing {
            return self
                .rooms
                .get_mut(room_id)
                .ok_or_else(|| RoomError::NotFound(room_id.clone()));
        }

        let clock = &self.clock;
        Ok(self.rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!(room = %room_id, "Room created");
            Room::new(room_id.clone(), Timestamp::new(clock.now_millis()))
        }))
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// All rooms, sorted by id
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.id().cmp(b.id()));
        rooms
    }

    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Drop every room without members. Returns how many were removed.
    pub fn reap_empty_rooms(&mut self) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|room_id, room| {
            let keep = !room.is_empty();
            if !keep {
                tracing::info!(room = %room_id, "Empty room reaped");
            }
            keep
        });
        before - self.rooms.len()
    }
}
