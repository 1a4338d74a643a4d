//! Registry of live peer connections.
//!
//! Each admitted connection gets a fresh [`PeerId`] and is stored with the
//! sink used to reach it. Targeted sends look a peer up by id; broadcasts
//! walk every entry except the sender.
//!
//! ```text
//! ConnectionRegistry
//! ├── 4f9a0kz1c → ChannelSink → writer task → socket
//! ├── q81mmx0ta → ChannelSink → writer task → socket
//! └── 0c2hy7e5b → ChannelSink → writer task → socket
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::foundation::PeerId;
use crate::ports::PeerSink;

/// Lifecycle state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

/// Handle to an admitted connection.
///
/// Cheap to clone. The transport itself stays inside the registry; the
/// handle only carries the identifier and the open/closed flag.
#[derive(Debug, Clone)]
pub struct Connection {
    id: PeerId,
    open: Arc<AtomicBool>,
}

impl Connection {
    /// Identifier assigned at admission. Never reassigned.
    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn state(&self) -> ConnectionState {
        if self.open.load(Ordering::Acquire) {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }
}

struct Slot {
    sink: Box<dyn PeerSink>,
    open: Arc<AtomicBool>,
}

/// Live set of open connections, keyed by peer identifier.
///
/// # Thread Safety
///
/// A single `RwLock` guards the map. Admission and removal take the write
/// lock; `send_to` and `broadcast` iterate under the read lock. Sinks never
/// block, so no delivery waits on the network while the lock is held.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<PeerId, Slot>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Admit a transport, assigning it an identifier no open connection uses.
    ///
    /// Generated ids are random; on the rare collision with a live id a new
    /// one is drawn.
    pub async fn admit<S>(&self, sink: S) -> Connection
    where
        S: PeerSink + 'static,
    {
        let mut connections = self.connections.write().await;

        let id = loop {
            let candidate = PeerId::generate();
            if !connections.contains_key(&candidate) {
                break candidate;
            }
            tracing::warn!(peer_id = %candidate, "Generated peer id already in use, regenerating");
        };

        let open = Arc::new(AtomicBool::new(true));
        connections.insert(
            id.clone(),
            Slot {
                sink: Box::new(sink),
                open: open.clone(),
            },
        );

        Connection { id, open }
    }

    /// Close a connection and evict it.
    ///
    /// Idempotent: removing an already-removed connection is a no-op.
    /// Returns `true` only when an entry was actually evicted.
    pub async fn remove(&self, connection: &Connection) -> bool {
        connection.open.store(false, Ordering::Release);

        let mut connections = self.connections.write().await;
        match connections.get(&connection.id) {
            Some(slot) if Arc::ptr_eq(&slot.open, &connection.open) => {
                connections.remove(&connection.id);
                true
            }
            _ => false,
        }
    }

    /// Deliver `payload` verbatim to the connection with identifier `id`.
    ///
    /// Unknown ids and non-writable transports are silently skipped.
    /// Returns whether the payload was handed to a transport.
    pub async fn send_to(&self, id: &PeerId, payload: &str) -> bool {
        let connections = self.connections.read().await;

        match connections.get(id) {
            Some(slot) => deliver(id, slot, payload),
            None => {
                tracing::debug!(peer_id = %id, "No open connection for target, dropping message");
                false
            }
        }
    }

    /// Deliver `payload` verbatim to every open connection except `exclude`.
    ///
    /// Returns the number of connections the payload was handed to.
    pub async fn broadcast(&self, payload: &str, exclude: &PeerId) -> usize {
        let connections = self.connections.read().await;

        let mut recipients = 0;
        for (id, slot) in connections.iter() {
            if id != exclude && deliver(id, slot, payload) {
                recipients += 1;
            }
        }
        recipients
    }

    /// Number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver(id: &PeerId, slot: &Slot, payload: &str) -> bool {
    if !slot.open.load(Ordering::Acquire) || !slot.sink.is_open() {
        tracing::trace!(peer_id = %id, "Skipping non-writable connection");
        return false;
    }

    match slot.sink.deliver(payload) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(peer_id = %id, "Delivery failed: {}", e);
            false
        }
    }
}
