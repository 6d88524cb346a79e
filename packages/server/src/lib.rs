//! Room-based command relay for multiplayer games.
//!
//! Clients connect over WebSocket, join named rooms and exchange
//! `CMD:<correlationId>:<roomId>:<command>:<args>` frames; the relay fans
//! each command out to the other members of the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod protocol;
pub mod ui;
pub mod usecase;

pub mod config;

#[cfg(test)]
pub(crate) mod test_support;
