//! Domain layer of the relay.
//!
//! Rooms, connections and the registry that owns the rooms. Everything here is
//! synchronous; callers serialize access through [`SharedRoomRegistry`].

pub mod connection;
pub mod error;
pub mod factory;
pub mod pusher;
pub mod registry;
pub mod room;
pub mod value_object;

pub use connection::{Connection, ConnectionHandle};
pub use error::{PushError, RoomError, ValueObjectError};
pub use factory::ConnectionIdGenerator;
pub use pusher::FrameSink;
pub use registry::{RoomRegistry, SharedRoomRegistry};
pub use room::{MemberSnapshot, Room, RoomSnapshot};
pub use value_object::{ConnectionId, RoomId, Timestamp};
