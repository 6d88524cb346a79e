//! Inbound command decoding.

use std::{fmt, str::FromStr};

use serde_json::Value;
use thiserror::Error;

use super::{
    COMMAND_PREFIX, FIELD_SEPARATOR,
    args::{ArgsError, decode_args},
};

/// The closed set of commands a client may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Join,
    Quit,
    Update,
    Message,
    PrivateMessage,
}

impl CommandName {
    pub const ALL: [CommandName; 5] = [
        CommandName::Join,
        CommandName::Quit,
        CommandName::Update,
        CommandName::Message,
        CommandName::PrivateMessage,
    ];

    /// Wire spelling of the command
    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Join => "join",
            CommandName::Quit => "quit",
            CommandName::Update => "update",
            CommandName::Message => "message",
            CommandName::PrivateMessage => "privateMessage",
        }
    }

    /// Number of positional arguments the command takes
    pub fn arity(self) -> usize {
        match self {
            CommandName::Join | CommandName::Quit => 0,
            CommandName::Update | CommandName::Message => 1,
            CommandName::PrivateMessage => 2,
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a command name is not part of the protocol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}'")]
pub struct UnknownCommandName(pub String);

impl FromStr for CommandName {
    type Err = UnknownCommandName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownCommandName(s.to_string()))
    }
}

/// A decoded inbound command
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Client-chosen token echoed back in the acknowledgement
    pub correlation_id: String,
    /// Target room identifier
    pub room_id: String,
    pub name: CommandName,
    pub args: Vec<Value>,
}

/// Errors raised while decoding an inbound frame
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame does not start with `CMD:`
    #[error("not a command")]
    NotACommand,

    /// The frame starts with `CMD:` but does not have the five-field shape
    #[error("invalid command syntax")]
    Syntax,

    /// The argument segment is not a serialized list
    #[error("bad arguments: {0}")]
    BadArgs(#[from] ArgsError),

    /// The command name is not one of the supported commands
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

/// Decode one inbound frame.
///
/// The argument segment is everything after the fourth separator, so JSON
/// arguments may themselves contain colons.
///
/// # Errors
///
/// See [`DecodeError`] for the failure classes. Shape errors are reported
/// before unknown command names, which are reported before argument errors.
pub fn decode(raw: &str) -> Result<Command, DecodeError> {
    let body = raw
        .strip_prefix(COMMAND_PREFIX)
        .ok_or(DecodeError::NotACommand)?;

    let mut fields = body.splitn(4, FIELD_SEPARATOR);
    let (Some(correlation_id), Some(room_id), Some(name), Some(args)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(DecodeError::Syntax);
    };

    if correlation_id.is_empty() || room_id.is_empty() || name.is_empty() {
        return Err(DecodeError::Syntax);
    }

    let name = name
        .parse::<CommandName>()
        .map_err(|UnknownCommandName(name)| DecodeError::UnknownCommand(name))?;
    let args = decode_args(args)?;

    Ok(Command {
        correlation_id: correlation_id.to_string(),
        room_id: room_id.to_string(),
        name,
        args,
    })
}
