//! PeerSink port - Outbound side of one peer's transport.
//!
//! The connection registry owns one sink per admitted connection and uses it
//! for every delivery. Sinks are synchronous and never wait on the network:
//! a sink either accepts the payload for delivery or reports that the
//! underlying transport is gone.

/// Errors that can occur when handing a payload to a sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The transport has shut down and accepts no more messages.
    #[error("Transport is closed")]
    Closed,
}

/// Port for delivering text payloads to a single connected peer.
///
/// Implementations must deliver the payload verbatim, without re-encoding.
///
/// # Example
///
/// ```ignore
/// let (sink, mut outbound) = ChannelSink::new();
/// let connection = registry.admit(sink).await;
/// // a writer task forwards `outbound` to the socket
/// ```
pub trait PeerSink: Send + Sync {
    /// Whether the transport can currently accept messages.
    fn is_open(&self) -> bool;

    /// Hand `payload` to the transport.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Closed` if the transport shut down.
    fn deliver(&self, payload: &str) -> Result<(), DeliveryError>;
}
