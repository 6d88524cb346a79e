//! Outbound frame encoding and literal replies.

use serde_json::Value;

use super::{ACK_PREFIX, COMMAND_PREFIX, CommandName, FIELD_SEPARATOR, encode_args};

/// Reply to a frame that does not start with `CMD:`
pub const INVALID_COMMAND: &str = "Invalid command";

/// Reply to a `CMD:` frame without the five-field shape
pub const INVALID_COMMAND_SYNTAX: &str = "Invalid command syntax";

/// Reply to a non-join command addressed to an unknown room
pub const INVALID_GAME: &str = "ERROR:Invalid Game";

/// Reply to `privateMessage`, which is not delivered
pub const PRIVATE_MESSAGE_UNAVAILABLE: &str = "WIP";

/// Encode the acknowledgement of a successfully handled command.
pub fn encode_ack(correlation_id: &str) -> String {
    format!("{ACK_PREFIX}{correlation_id}")
}

/// Encode a fan-out frame.
///
/// Fan-out frames carry no room or correlation fields.
pub fn encode_broadcast(name: CommandName, args: &[Value]) -> String {
    format!(
        "{COMMAND_PREFIX}{}{FIELD_SEPARATOR}{}",
        name,
        encode_args(args)
    )
}
