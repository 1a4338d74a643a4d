//! Channel-backed [`PeerSink`] feeding a connection's socket writer task.

use tokio::sync::mpsc;

use crate::ports::{DeliveryError, PeerSink};

/// Sink that queues payloads on an unbounded channel.
///
/// The receiving half is drained by the task that owns the socket's write
/// half. Once that task exits and drops the receiver, the sink reports
/// itself closed and further deliveries fail.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiver its writer task should drain.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PeerSink for ChannelSink {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        self.tx
            .send(payload.to_owned())
            .map_err(|_| DeliveryError::Closed)
    }
}
