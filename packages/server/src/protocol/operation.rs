//! Typed room operations bound from decoded commands.

use serde_json::Value;
use thiserror::Error;

use super::CommandName;

/// A room operation with its positional arguments bound
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Join,
    Quit,
    Update { info: Value },
    Message { text: Value },
    PrivateMessage { destination: Value, text: Value },
}

/// The argument list does not match the command's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command '{command}' expects {expected} argument(s), got {actual}")]
pub struct ArgumentCountError {
    pub command: CommandName,
    pub expected: usize,
    pub actual: usize,
}

impl Operation {
    /// Spread a decoded argument list onto the named operation's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentCountError`] when the list length differs from
    /// [`CommandName::arity`].
    pub fn bind(name: CommandName, mut args: Vec<Value>) -> Result<Self, ArgumentCountError> {
        match (name, args.as_mut_slice()) {
            (CommandName::Join, []) => Ok(Operation::Join),
            (CommandName::Quit, []) => Ok(Operation::Quit),
            (CommandName::Update, [info]) => Ok(Operation::Update { info: info.take() }),
            (CommandName::Message, [text]) => Ok(Operation::Message { text: text.take() }),
            (CommandName::PrivateMessage, [destination, text]) => Ok(Operation::PrivateMessage {
                destination: destination.take(),
                text: text.take(),
            }),
            (name, args) => Err(ArgumentCountError {
                command: name,
                expected: name.arity(),
                actual: args.len(),
            }),
        }
    }

    pub fn name(&self) -> CommandName {
        match self {
            Operation::Join => CommandName::Join,
            Operation::Quit => CommandName::Quit,
            Operation::Update { .. } => CommandName::Update,
            Operation::Message { .. } => CommandName::Message,
            Operation::PrivateMessage { .. } => CommandName::PrivateMessage,
        }
    }

    /// Only `join` may create the room it addresses.
    pub fn creates_room(&self) -> bool {
        matches!(self, Operation::Join)
    }
}
