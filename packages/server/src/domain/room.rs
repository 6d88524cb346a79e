//! Room entity: an ordered broadcast group of connections.

use serde_json::Value;

use super::{Connection, ConnectionHandle, ConnectionId, PushError, RoomId, Timestamp};
use crate::protocol::{CommandName, PRIVATE_MESSAGE_UNAVAILABLE, encode_broadcast};

/// A named group of connections ("game").
///
/// Invariants:
/// - a connection appears at most once in `members`
/// - removing a member keeps every other member, in its original order
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    created_at: Timestamp,
    members: Vec<ConnectionHandle>,
}

/// Read model of one member, for the HTTP API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
}

/// Read model of a room, for the HTTP API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub members: Vec<MemberSnapshot>,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Member ids in join order
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.id().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &ConnectionId) -> Option<usize> {
        self.members.iter().position(|m| m.id() == id)
    }

    /// Add `conn` to the room and announce it to the other members.
    ///
    /// Joining a room the connection is already in changes nothing but the
    /// connection's current room. Returns whether the member list changed.
    pub fn join(&mut self, conn: &mut Connection) -> bool {
        conn.set_current_room(self.id.clone());

        if self.contains(conn.id()) {
            tracing::debug!(room = %self.id, connection = %conn.id(), "Already a member, join ignored");
            return false;
        }

        self.members.push(conn.handle().clone());
        tracing::info!(
            room = %self.id,
            connection = %conn.id(),
            members = self.members.len(),
            "Connection joined room"
        );
        self.broadcast(Some(conn.id()), CommandName::Join, &[conn.id().to_arg()]);
        true
    }

    /// Remove `conn` from the room and announce it to the remaining members.
    ///
    /// Quitting a room the connection is not in is a silent no-op. Returns
    /// whether the member list changed.
    pub fn quit(&mut self, conn: &mut Connection) -> bool {
        let Some(index) = self.position(conn.id()) else {
            return false;
        };

        // In place: every other member keeps its slot order.
        self.members.remove(index);
        if conn.current_room() == Some(&self.id) {
            conn.clear_current_room();
        }

        tracing::info!(
            room = %self.id,
            connection = %conn.id(),
            members = self.members.len(),
            "Connection quit room"
        );
        self.broadcast(None, CommandName::Quit, &[conn.id().to_arg()]);
        true
    }

    /// Fan `info` out to every member but `conn`.
    ///
    /// `conn` does not have to be a member. Returns the number of frames delivered.
    pub fn update(&self, conn: &Connection, info: Value) -> usize {
        self.broadcast(Some(conn.id()), CommandName::Update, &[conn.id().to_arg(), info])
    }

    /// Fan `text` out to every member but `conn`.
    ///
    /// `conn` does not have to be a member. Returns the number of frames delivered.
    pub fn message(&self, conn: &Connection, text: Value) -> usize {
        self.broadcast(Some(conn.id()), CommandName::Message, &[conn.id().to_arg(), text])
    }

    /// Point-to-point delivery is not available; only the sender is told so.
    pub fn private_message(
        &self,
        conn: &Connection,
        destination: &Value,
        _text: &Value,
    ) -> Result<(), PushError> {
        tracing::debug!(
            room = %self.id,
            connection = %conn.id(),
            %destination,
            "Private message requested but not supported"
        );
        conn.send(PRIVATE_MESSAGE_UNAVAILABLE)
    }

    /// Send one fan-out frame to every member except `ignore`, in member order.
    ///
    /// A failed send is logged and does not stop delivery to the others.
    /// Returns the number of members the frame was delivered to.
    pub fn broadcast(
        &self,
        ignore: Option<&ConnectionId>,
        command: CommandName,
        args: &[Value],
    ) -> usize {
        let frame = encode_broadcast(command, args);
        let mut delivered = 0;

        for member in self.members.iter().filter(|m| Some(m.id()) != ignore) {
            match member.send(&frame) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    room = %self.id,
                    connection = %member.id(),
                    error = %e,
                    "Failed to deliver {} frame",
                    command
                ),
            }
        }

        tracing::debug!(room = %self.id, %command, delivered, "Broadcast complete");
        delivered
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            created_at: self.created_at,
            members: self
                .members
                .iter()
                .map(|m| MemberSnapshot {
                    id: m.id().clone(),
                    connected_at: m.connected_at(),
                })
                .collect(),
        }
    }
}
