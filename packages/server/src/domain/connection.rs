//! Connection entity.

use std::{fmt, sync::Arc};

use super::{ConnectionId, FrameSink, PushError, RoomId, Timestamp};

/// Cheap, cloneable view of a connection that rooms store as members.
///
/// Two handles refer to the same connection when their ids are equal.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    connected_at: Timestamp,
    sink: Arc<dyn FrameSink>,
}

impl ConnectionHandle {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn send(&self, frame: &str) -> Result<(), PushError> {
        self.sink.push(frame)
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

/// One client's session with the relay, owned by its socket task.
///
/// `current_room` is a lookup key into the registry, never an owning
/// reference: the registry is the only owner of rooms and each room's member
/// list is the source of truth for membership.
#[derive(Debug)]
pub struct Connection {
    handle: ConnectionHandle,
    current_room: Option<RoomId>,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp, sink: Arc<dyn FrameSink>) -> Self {
        Self {
            handle: ConnectionHandle {
                id,
                connected_at,
                sink,
            },
            current_room: None,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.handle.id
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    /// The room this connection last joined, if it has not quit it since
    pub fn current_room(&self) -> Option<&RoomId> {
        self.current_room.as_ref()
    }

    pub fn send(&self, frame: &str) -> Result<(), PushError> {
        self.handle.send(frame)
    }

    pub(crate) fn set_current_room(&mut self, room_id: RoomId) {
        self.current_room = Some(room_id);
    }

    pub(crate) fn clear_current_room(&mut self) {
        self.current_room = None;
    }
}
