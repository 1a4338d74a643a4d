//! Server-originated WebSocket message types.
//!
//! Peer-to-peer signaling messages are relayed as raw text and have no type
//! here. These are the few messages the server itself writes to a client.

use serde::Serialize;

use crate::domain::foundation::{PeerId, Timestamp};

/// All message types that the server sends on its own behalf.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once, right after admission, announcing the client's identifier.
    Connected(ConnectedMessage),
}

/// Tells a newly admitted client which identifier peers must target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub id: String,
    pub timestamp: String,
}

impl ServerMessage {
    /// Build the admission announcement for `peer_id`.
    pub fn connected(peer_id: &PeerId) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            id: peer_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}
