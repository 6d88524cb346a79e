//! Data Transfer Objects (DTOs) for the relay.
//!
//! The WebSocket protocol is a line format handled by `crate::protocol`;
//! only the HTTP API uses serialized DTOs.

pub mod http;
