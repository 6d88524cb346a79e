//! WebSocket session handling.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Request, State,
        ws::{
            CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code,
            rejection::WebSocketUpgradeRejection,
        },
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{Connection, Timestamp},
    infrastructure::message_pusher::{ChannelFrameSink, OutboundFrame},
    protocol::INVALID_COMMAND,
    ui::state::AppState,
};

/// Close reasons must fit a control frame (125 bytes minus the status code)
const MAX_CLOSE_REASON_BYTES: usize = 123;

/// How long queued frames may take to flush after the session ends
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// `GET /`: upgrade WebSocket requests, serve the static index otherwise.
///
/// Clients of the original relay connect to the root path.
pub async fn root_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Response {
    if let Ok(ws) = ws {
        return ws
            .on_upgrade(move |socket| handle_socket(socket, state))
            .into_response();
    }

    let Some(mut files) = state.static_files.clone() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match files.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve static index: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Spawns a task that drains the connection's outbound queue into the WebSocket.
///
/// Every frame pushed by rooms or the dispatcher goes through this task, so
/// frames reach the client in the order they were queued. A close frame is
/// the last thing written.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close { code, reason } => {
                    let close = CloseFrame {
                        code,
                        reason: reason.into(),
                    };
                    if let Err(e) = sender.send(Message::Close(Some(close))).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let mut conn = Connection::new(
        state.id_generator.generate(),
        Timestamp::new(state.clock.now_millis()),
        Arc::new(ChannelFrameSink::new(tx.clone())),
    );
    tracing::info!(connection = %conn.id(), "Connection opened");

    let mut send_task = pusher_loop(rx, sender);
    let mut writer_done = false;

    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut send_task => {
                writer_done = true;
                tracing::debug!(connection = %conn.id(), "Writer stopped");
                break;
            }
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!(connection = %conn.id(), "WebSocket error: {}", e);
                break;
            }
            None => break,
        };

        let text = match msg {
            Message::Text(text) => text.as_str().to_string(),
            Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => text,
                Err(_) => {
                    tracing::debug!(connection = %conn.id(), "Binary frame is not UTF-8");
                    if let Err(e) = conn.send(INVALID_COMMAND) {
                        tracing::warn!(connection = %conn.id(), error = %e, "Failed to send reply");
                    }
                    continue;
                }
            },
            Message::Close(_) => {
                tracing::info!(connection = %conn.id(), "Client requested close");
                break;
            }
            // Ping/pong is handled by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        if let Err(e) = state.dispatcher.handle_message(&mut conn, &text).await {
            tracing::warn!(connection = %conn.id(), error = %e, "Protocol violation, closing connection");
            let close = OutboundFrame::Close {
                code: close_code::PROTOCOL,
                reason: close_reason(&e.to_string()),
            };
            if tx.send(close).is_err() {
                tracing::debug!(connection = %conn.id(), "Writer already gone");
            }
            break;
        }
    }

    let left = state.dispatcher.handle_disconnect(&mut conn).await;
    tracing::info!(connection = %conn.id(), rooms = left, "Connection closed");

    // Once every sender is gone the writer drains what is queued and stops.
    drop(conn);
    drop(tx);
    if !writer_done && tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
        tracing::warn!("Writer did not finish in time, aborting");
        send_task.abort();
    }
}

/// Truncate a diagnostic to fit a close frame, on a character boundary
fn close_reason(diagnostic: &str) -> String {
    let mut end = diagnostic.len().min(MAX_CLOSE_REASON_BYTES);
    while !diagnostic.is_char_boundary(end) {
        end -= 1;
    }
    diagnostic[..end].to_string()
}
