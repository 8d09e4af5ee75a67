//! WebSocket subscription endpoint

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::debug;

use super::registry::{ChannelSubscriber, Registry};
use super::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    let registry = state.registry.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, registry))
}

/// Register the connection, then read and discard client frames until it closes
pub async fn handle_socket(socket: WebSocket, registry: Arc<Registry>) {
    let (mut sink, mut stream) = socket.split();
    let (subscriber, mut rx) = ChannelSubscriber::new();
    let id = registry.register(Arc::new(subscriber));

    // Forward broadcasts to the socket; when this stops, rx is dropped and the
    // next broadcast evicts the subscriber.
    let mut writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Ok(json) = serde_json::to_string(&msg) else {
                continue;
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {} // clients have nothing to say
            },
            _ = &mut writer => break,
        }
    }

    registry.unregister(id);
    writer.abort();
    debug!("subscriber disconnected");
}
