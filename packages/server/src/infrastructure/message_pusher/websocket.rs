//! WebSocket を使った FrameSink 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を保持し、フレームをキューに積む
//!
//! ## 設計ノート
//!
//! WebSocket への実際の書き込みは UI 層（`ui/handler/websocket.rs`）の
//! 書き込みタスクが行います。ここではキューに積むだけなので、ブロードキャスト中に
//! 遅いクライアントを待つことはありません。

use tokio::sync::mpsc;

use crate::domain::{FrameSink, PushError};

/// 書き込みタスクへ渡すフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// テキストフレーム
    Text(String),
    /// クローズフレーム（送信後、書き込みタスクは終了する）
    Close { code: u16, reason: String },
}

/// 書き込みタスクへのチャンネル
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// チャンネルを使った FrameSink 実装
pub struct ChannelFrameSink {
    sender: PusherChannel,
}

impl ChannelFrameSink {
    pub fn new(sender: PusherChannel) -> Self {
        Self { sender }
    }
}

impl FrameSink for ChannelFrameSink {
    fn push(&self, frame: &str) -> Result<(), PushError> {
        self.sender
            .send(OutboundFrame::Text(frame.to_string()))
            .map_err(|_| PushError::ChannelClosed)
    }
}
