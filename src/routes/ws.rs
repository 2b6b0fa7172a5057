//! WebSocket handler: snapshot push plus action intake.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client text → parse as a `BoardAction` → perform it
//! - Broadcast snapshots from any mutation → forward to client
//!
//! Successful actions reply with nothing directly; the resulting snapshot
//! arrives through the broadcast like it does for every other client.
//! Failures reply to the sender only.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `connected` with `client_id`, then the current snapshot
//! 2. Client sends actions → perform → error frame on failure
//! 3. Every published snapshot is forwarded; a lagging client gets the latest
//! 4. Close → cleanup

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::services::board::{self, BoardAction, BoardError, BoardSnapshot};
use crate::services::catalog;
use crate::state::AppState;

/// Frames sent to a websocket client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected { client_id: Uuid },
    Snapshot { snapshot: BoardSnapshot },
    Error { code: &'static str, message: String, retryable: bool },
}

impl ServerMessage {
    fn error(err: &BoardError) -> Self {
        Self::Error { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let mut snapshots = state.snapshots.subscribe();

    if send(&mut socket, &ServerMessage::Connected { client_id }).await.is_err() {
        return;
    }
    if send_current(&mut socket, &state).await.is_err() {
        return;
    }

    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = process_inbound_text(&state, client_id, text.as_str()).await;
                        if send_all(&mut socket, &replies).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            snapshot = snapshots.recv() => {
                let sent = match snapshot {
                    Ok(snapshot) => send(&mut socket, &ServerMessage::Snapshot { snapshot }).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%client_id, skipped, "ws: snapshot stream lagged");
                        send_current(&mut socket, &state).await
                    }
                    Err(RecvError::Closed) => break,
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    info!(%client_id, "ws: client disconnected");
}

/// Parse and perform one inbound action, returning frames for the sender.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) -> Vec<ServerMessage> {
    let action: BoardAction = match serde_json::from_str(text) {
        Ok(action) => action,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound action");
            return vec![ServerMessage::Error {
                code: "E_INVALID_ACTION",
                message: format!("invalid action: {e}"),
                retryable: false,
            }];
        }
    };

    info!(%client_id, ?action, "ws: recv action");
    match catalog::perform(state, action).await {
        Ok(_) => Vec::new(),
        Err(e) => vec![ServerMessage::error(&e)],
    }
}

async fn send_current(socket: &mut WebSocket, state: &AppState) -> Result<(), axum::Error> {
    match board::snapshot(state).await {
        Ok(snapshot) => send(socket, &ServerMessage::Snapshot { snapshot }).await,
        Err(e) => send(socket, &ServerMessage::error(&e)).await,
    }
}

/// Send `messages` in order, stopping at the first failed write.
async fn send_all(socket: &mut WebSocket, messages: &[ServerMessage]) -> Result<(), axum::Error> {
    for message in messages {
        send(socket, message).await?;
    }
    Ok(())
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "ws: failed to encode message");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
