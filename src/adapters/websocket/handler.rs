//! WebSocket upgrade handler for signaling connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Admit the connection to the registry and assign its peer id
//! 2. Announce the id to the client
//! 3. Route every inbound text frame until the client goes away
//! 4. Evict the connection from the registry

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Json, Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::{
    messages::ServerMessage,
    registry::ConnectionRegistry,
    router::MessageRouter,
    sink::ChannelSink,
};

/// State required for WebSocket handling.
///
/// One instance lives for the whole server process.
#[derive(Clone)]
pub struct WebSocketState {
    /// Registry of every open signaling connection.
    pub registry: Arc<ConnectionRegistry>,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Routes: `GET /`, `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. A writer task drains the
/// connection's sink onto the socket while this task reads and routes
/// inbound frames. Whichever side finishes first ends the connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let (sink, mut outbound) = ChannelSink::new();
    let connection = state.registry.admit(sink).await;
    let peer_id = connection.id().clone();

    tracing::info!(peer_id = %peer_id, "Client connected");

    // Writer: announcement first, then whatever peers relay to us
    let mut send_task = {
        let peer_id = peer_id.clone();
        let connected = ServerMessage::connected(&peer_id);
        tokio::spawn(async move {
            if let Err(e) = send_message(&mut sender, &connected).await {
                tracing::debug!(peer_id = %peer_id, "Failed to send connected message: {}", e);
                return;
            }

            while let Some(payload) = outbound.recv().await {
                if let Err(e) = sender.send(Message::Text(payload)).await {
                    tracing::debug!(peer_id = %peer_id, "Send error, closing connection: {}", e);
                    break;
                }
            }
        })
    };

    // Reader: route each inbound text frame
    let mut recv_task = {
        let router = MessageRouter::new(state.registry.clone());
        let connection = connection.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        router.dispatch(&connection, &text).await;
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(
                            peer_id = %connection.id(),
                            "Received unsupported binary message"
                        );
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                        // Protocol-level keepalive, answered by axum
                    }
                    Ok(Message::Close(_)) => {
                        tracing::debug!(peer_id = %connection.id(), "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(peer_id = %connection.id(), "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.remove(&connection).await;
    tracing::info!(peer_id = %peer_id, "Client disconnected");
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
}

/// Report liveness and the number of open connections.
///
/// Route: `GET /health`
pub async fn health(State(state): State<WebSocketState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.registry.connection_count().await,
    })
}

/// Create axum router for the signaling endpoints.
///
/// # Example
///
/// ```ignore
/// let app = websocket_router().with_state(WebSocketState::new(registry));
/// ```
pub fn websocket_router() -> Router<WebSocketState> {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
}

/// Full application: signaling routes, request tracing, and shared state.
pub fn app(state: WebSocketState) -> Router {
    websocket_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
