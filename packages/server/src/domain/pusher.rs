//! メッセージ送信の抽象化
//!
//! ドメイン層が必要とする「接続へフレームを送る」インターフェース。
//! 具体的な実装（WebSocket 用のチャンネル）は Infrastructure 層が提供します。

use super::PushError;

/// Outbound side of one connection.
///
/// `push` must not block: the room calls it synchronously for every member
/// while fanning out.
#[cfg_attr(test, mockall::automock)]
pub trait FrameSink: Send + Sync {
    fn push(&self, frame: &str) -> Result<(), PushError>;
}
