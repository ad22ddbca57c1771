//! WebSocket adapter between sockets and the hub.

use crate::hub::{HubCommand, HubHandle};
use crate::protocol::{ClientEvent, ServerEvent};
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Builds the HTTP router: `GET /ws` for events, `GET /health` for probes.
pub fn router(hub: HubHandle) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(hub)
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<HubHandle>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

/// Decodes one text frame. Frames that do not decode are dropped.
pub fn decode_frame(text: &str) -> Option<ClientEvent> {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, "Malformed frame ignored");
            None
        }
    }
}

#[instrument(skip_all, fields(connection_id))]
async fn handle_socket(socket: WebSocket, hub: HubHandle) {
    let connection_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("connection_id", connection_id.as_str());
    info!("Device connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    if !hub.send(HubCommand::Connect {
        connection_id: connection_id.clone(),
        outbound: tx,
    }) {
        return;
    }

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, event = event.name(), "Failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                let Some(event) = decode_frame(text.as_str()) else {
                    continue;
                };
                debug!(event = event.name(), "Event received");
                let delivered = hub.send(HubCommand::Event {
                    connection_id: connection_id.clone(),
                    event,
                });
                if !delivered {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    hub.send(HubCommand::Disconnect {
        connection_id: connection_id.clone(),
    });
    writer.abort();
    info!("Disconnected");
}
