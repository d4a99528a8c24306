//! WebSocket handler pushing preview events to connected clients.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast;

use crate::state::AppState;

/// Handle WebSocket upgrade requests for the preview stream.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut receiver = state.driver.subscribe();
    tracing::debug!("preview client connected");

    // A freshly opened tab gets the newest frame straight away instead of
    // waiting for the next save.
    if let Some(event) = state.driver.latest_event() {
        let message = serde_json::to_string(&event).unwrap();
        if socket.send(Message::Text(message.into())).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            // Forward preview events to the client
            result = receiver.recv() => {
                match result {
                    Ok(event) => {
                        let message = serde_json::to_string(&event).unwrap();
                        if socket.send(Message::Text(message.into())).await.is_err() {
                            // Client disconnected
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "preview client lagged behind");
                    }
                }
            }
            // Handle incoming messages (keepalive)
            result = socket.recv() => {
                match result {
                    Some(Ok(_)) => {
                        // Ignore client messages
                    }
                    _ => break,
                }
            }
        }
    }

    tracing::debug!("preview client disconnected");
}
