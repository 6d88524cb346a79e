//! UseCase 層のエラー型

use thiserror::Error;

use crate::protocol::{ArgsError, ArgumentCountError};

/// Protocol violations the dispatcher cannot recover from.
///
/// The caller must end the session; the dispatcher itself leaves rooms
/// untouched when it returns one of these.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The argument payload is not a serialized list
    #[error("malformed argument payload: {0}")]
    BadArgs(#[source] ArgsError),

    /// The command name is not part of the protocol
    #[error("unsupported command '{0}'")]
    UnsupportedCommand(String),

    /// The argument list does not fit the command
    #[error(transparent)]
    ArgumentCount(#[from] ArgumentCountError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id")]
    InvalidRoomId,

    #[error("room not found")]
    RoomNotFound,
}
