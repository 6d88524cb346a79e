//! ドメイン層のエラー型

use thiserror::Error;

use super::RoomId;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room id '{0}' must not contain ':'")]
    RoomIdContainsSeparator(String),
}

/// フレーム送信時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    /// 送信先のチャンネルが既に閉じている
    #[error("outbound channel is closed")]
    ChannelClosed,
}

/// ルーム解決時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room '{0}' not found")]
    NotFound(RoomId),
}
