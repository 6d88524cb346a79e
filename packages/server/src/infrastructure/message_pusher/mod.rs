//! メッセージ送信（通知）の実装
//!
//! ## 実装
//!
//! - `websocket`: WebSocket の書き込みタスクへ繋がるチャンネルを使った実装

pub mod websocket;

pub use websocket::{ChannelFrameSink, OutboundFrame, PusherChannel};
