//! WebSocket adapters for peer-to-peer call signaling.
//!
//! This module accepts signaling connections, assigns each an identifier,
//! and relays messages between them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   ws_handler (axum upgrade)                         │
//! │   - admits the socket, announces its peer id                        │
//! │   - reader task: inbound text → MessageRouter                       │
//! │   - writer task: ChannelSink queue → socket                         │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ dispatch(sender, raw)
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      MessageRouter                                  │
//! │   Envelope::parse → Route::{Direct, Broadcast, Ignore}              │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ send_to / broadcast
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    ConnectionRegistry                               │
//! │   peer-a → sink    peer-b → sink    peer-c → sink                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`registry`] - Live connection set and delivery primitives
//! - [`router`] - Message classification and dispatch
//! - [`sink`] - Channel-backed `PeerSink` for socket writer tasks
//! - [`messages`] - Server-originated message types
//! - [`handler`] - Axum WebSocket upgrade handler and routes

pub mod handler;
pub mod messages;
pub mod registry;
pub mod router;
pub mod sink;

pub use handler::{app, health, websocket_router, ws_handler, HealthResponse, WebSocketState};
pub use messages::{ConnectedMessage, ServerMessage};
pub use registry::{Connection, ConnectionRegistry, ConnectionState};
pub use router::{Dispatch, DropReason, MessageRouter};
pub use sink::ChannelSink;
