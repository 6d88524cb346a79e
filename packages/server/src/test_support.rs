//! Test fixtures shared by unit tests across layers.

use std::sync::Arc;

use ludo_relay_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{Connection, ConnectionId, RoomId, RoomRegistry, Timestamp},
    infrastructure::message_pusher::{ChannelFrameSink, OutboundFrame},
};

pub const TEST_NOW: i64 = 1_700_000_000_000;

/// A connection backed by a real channel, plus the receiving end to inspect
pub fn connection(id: &str) -> (Connection, mpsc::UnboundedReceiver<OutboundFrame>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let conn = Connection::new(
        ConnectionId::new(id.to_string()).unwrap(),
        Timestamp::new(TEST_NOW),
        Arc::new(ChannelFrameSink::new(tx)),
    );
    (conn, rx)
}

/// Every text frame queued so far, in order
pub fn drain_texts(rx: &mut mpsc::UnboundedReceiver<OutboundFrame>) -> Vec<String> {
    let mut texts = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let OutboundFrame::Text(text) = frame {
            texts.push(text);
        }
    }
    texts
}

pub fn ids(ids: &[&str]) -> Vec<ConnectionId> {
    ids.iter()
        .map(|id| ConnectionId::new(id.to_string()).unwrap())
        .collect()
}

pub fn room_id(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn registry() -> RoomRegistry {
    RoomRegistry::new(Arc::new(FixedClock::new(TEST_NOW)))
}
