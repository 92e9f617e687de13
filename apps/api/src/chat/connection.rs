//! One task pair per support-chat socket.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::chat::registry::Outbound;
use crate::chat::relay::{ChatRelay, Peer};

/// Runs a socket until the client goes away.
///
/// The writer task owns the sink and drains the connection's outbound
/// channel; the registry holds the only sender. The reader hands every text
/// frame to the relay without waiting on the answer.
pub async fn run_connection(socket: WebSocket, relay: ChatRelay, peer: Peer) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let conn_id = relay.registry().register(&peer.key, tx);
    let writer = tokio::spawn(write_outbound(sink, rx));

    info!(user_id = %peer.key, conn_id, "Support chat connection opened");

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                relay.dispatch_frame(&peer, &text);
            }
            Ok(Message::Close(frame)) => {
                debug!(user_id = %peer.key, reason = ?frame, "Client initiated close");
                break;
            }
            Ok(Message::Binary(_)) => {
                debug!(user_id = %peer.key, "Ignoring binary frame");
            }
            // Pings are answered by the socket layer.
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                warn!(user_id = %peer.key, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    relay.registry().release(&peer.key, conn_id);
    writer.abort();

    info!(user_id = %peer.key, conn_id, "Support chat connection closed");
}

async fn write_outbound(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
) {
    while let Some(outbound) = rx.recv().await {
        let message = match outbound {
            Outbound::Frame(frame) => match serde_json::to_string(&frame) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound frame");
                    continue;
                }
            },
            Outbound::Close { code, reason } => {
                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code,
                        reason: reason.into(),
                    })))
                    .await;
                break;
            }
        };

        if sink.send(message).await.is_err() {
            break;
        }
    }
}
