//! Wire protocol of the relay.
//!
//! Inbound frames look like `CMD:<correlationId>:<roomId>:<commandName>:<jsonArgsArray>`.
//! Outbound frames are acknowledgements (`ACK:<correlationId>`), fan-out commands
//! (`CMD:<commandName>:<jsonArgsArray>`) and a handful of literal error strings.
//!
//! This module is stateless and knows nothing about rooms or connections.

pub mod args;
pub mod command;
pub mod frame;
pub mod operation;

pub use args::{ArgsError, decode_args, encode_args};
pub use command::{Command, CommandName, DecodeError, decode};
pub use frame::{
    INVALID_COMMAND, INVALID_COMMAND_SYNTAX, INVALID_GAME, PRIVATE_MESSAGE_UNAVAILABLE,
    encode_ack, encode_broadcast,
};
pub use operation::{ArgumentCountError, Operation};

/// Prefix shared by inbound commands and outbound fan-out frames.
pub const COMMAND_PREFIX: &str = "CMD:";

/// Prefix of acknowledgement frames.
pub const ACK_PREFIX: &str = "ACK:";

/// Field separator of the line format.
pub const FIELD_SEPARATOR: char = ':';
