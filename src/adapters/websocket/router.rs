//! Message routing between connected peers.
//!
//! For every inbound text frame the router parses an [`Envelope`], asks it
//! for a [`Route`], and hands the original text to the registry. Parsing
//! and routing failures are logged and dropped; they never close the
//! sender's connection and nothing is reported back to it.

use std::sync::Arc;

use crate::domain::foundation::PeerId;
use crate::domain::signaling::{Envelope, EnvelopeError, Route};

use super::registry::{Connection, ConnectionRegistry};

/// Why a message produced no delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Not JSON, not an object, or `type`/`targetId` had an unusable shape.
    Malformed,
    /// No `type` field.
    MissingType,
    /// `type` is not one of the recognized kinds.
    Unrecognized(String),
}

/// Outcome of dispatching one message. Used for logging and tests only;
/// the sender never sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Sent to a single peer. `delivered` is false if the target was gone.
    Direct { target: PeerId, delivered: bool },
    /// Sent to everyone but the sender.
    Broadcast { recipients: usize },
    Dropped(DropReason),
}

/// Routes inbound messages through a shared [`ConnectionRegistry`].
///
/// Holds no state of its own; cloning shares the registry.
#[derive(Clone)]
pub struct MessageRouter {
    registry: Arc<ConnectionRegistry>,
}

impl MessageRouter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Classify `raw` and relay it, unchanged, to its recipients.
    pub async fn dispatch(&self, sender: &Connection, raw: &str) -> Dispatch {
        let envelope = match Envelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(peer_id = %sender.id(), "Dropping message: {}", e);
                let reason = match e {
                    EnvelopeError::Malformed(_)
                    | EnvelopeError::NotAnObject
                    | EnvelopeError::InvalidField(_) => DropReason::Malformed,
                    EnvelopeError::MissingType => DropReason::MissingType,
                };
                return Dispatch::Dropped(reason);
            }
        };

        tracing::debug!(
            peer_id = %sender.id(),
            kind = %envelope.kind(),
            target_id = ?envelope.target_id().map(PeerId::as_str),
            "Received message"
        );

        match envelope.route() {
            Route::Direct(target) => {
                let delivered = self.registry.send_to(&target, raw).await;
                if !delivered {
                    tracing::debug!(
                        peer_id = %sender.id(),
                        target_id = %target,
                        kind = %envelope.kind(),
                        "Target not reachable, message dropped"
                    );
                }
                Dispatch::Direct { target, delivered }
            }
            Route::Broadcast => {
                let recipients = self.registry.broadcast(raw, sender.id()).await;
                tracing::trace!(
                    peer_id = %sender.id(),
                    kind = %envelope.kind(),
                    recipients,
                    "Broadcast message"
                );
                Dispatch::Broadcast { recipients }
            }
            Route::Ignore => {
                tracing::warn!(
                    peer_id = %sender.id(),
                    kind = %envelope.kind(),
                    "Unknown message type"
                );
                Dispatch::Dropped(DropReason::Unrecognized(envelope.kind().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::registry::ConnectionState;
    use crate::adapters::websocket::sink::ChannelSink;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Peer {
        conn: Connection,
        rx: UnboundedReceiver<String>,
    }

    impl Peer {
        fn assert_received(&mut self, expected: &str) {
            assert_eq!(self.rx.try_recv().as_deref(), Ok(expected));
        }

        fn assert_silent(&mut self) {
            assert_eq!(self.rx.try_recv(), Err(TryRecvError::Empty));
        }

        /// Removed peers have had their sink dropped, so the channel is closed.
        fn assert_disconnected(&mut self) {
            assert_eq!(self.rx.try_recv(), Err(TryRecvError::Disconnected));
        }
    }

    async fn setup() -> (MessageRouter, Arc<ConnectionRegistry>, Peer, Peer, Peer) {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut peers = Vec::new();
        for _ in 0..3 {
            let (sink, rx) = ChannelSink::new();
            let conn = registry.admit(sink).await;
            peers.push(Peer { conn, rx });
        }
        let c = peers.pop().unwrap();
        let b = peers.pop().unwrap();
        let a = peers.pop().unwrap();
        (MessageRouter::new(registry.clone()), registry, a, b, c)
    }

    #[tokio::test]
    async fn call_reaches_only_target() {
        let (router, _registry, a, mut b, mut c) = setup().await;
        let raw = format!(r#"{{"type":"call","targetId":"{}"}}"#, b.conn.id());

        let outcome = router.dispatch(&a.conn, &raw).await;

        assert_eq!(
            outcome,
            Dispatch::Direct {
                target: b.conn.id().clone(),
                delivered: true
            }
        );
        b.assert_received(&raw);
        c.assert_silent();
    }

    #[tokio::test]
    async fn offer_reaches_everyone_but_sender() {
        let (router, _registry, mut a, mut b, mut c) = setup().await;
        let raw = r#"{"type":"offer","sdp":"v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1"}"#;

        let outcome = router.dispatch(&a.conn, raw).await;

        assert_eq!(outcome, Dispatch::Broadcast { recipients: 2 });
        b.assert_received(raw);
        c.assert_received(raw);
        a.assert_silent();
    }

    #[tokio::test]
    async fn offer_with_target_is_still_broadcast() {
        let (router, _registry, mut a, mut b, mut c) = setup().await;
        let raw = format!(r#"{{"type":"offer","targetId":"{}"}}"#, b.conn.id());

        let outcome = router.dispatch(&a.conn, &raw).await;

        assert_eq!(outcome, Dispatch::Broadcast { recipients: 2 });
        b.assert_received(&raw);
        c.assert_received(&raw);
        a.assert_silent();
    }

    #[tokio::test]
    async fn answer_and_candidate_broadcast() {
        let (router, _registry, a, mut b, mut c) = setup().await;

        for raw in [
            r#"{"type":"answer","sdp":"x"}"#,
            r#"{"type":"candidate","candidate":{"sdpMid":"0","sdpMLineIndex":0}}"#,
        ] {
            assert_eq!(
                router.dispatch(&a.conn, raw).await,
                Dispatch::Broadcast { recipients: 2 }
            );
            b.assert_received(raw);
            c.assert_received(raw);
        }
    }

    #[tokio::test]
    async fn call_control_without_target_broadcasts() {
        let (router, _registry, mut a, mut b, mut c) = setup().await;
        let raw = r#"{"type":"call-ended"}"#;

        let outcome = router.dispatch(&a.conn, raw).await;

        assert_eq!(outcome, Dispatch::Broadcast { recipients: 2 });
        b.assert_received(raw);
        c.assert_received(raw);
        a.assert_silent();
    }

    #[tokio::test]
    async fn call_to_departed_peer_drops_silently() {
        let (router, registry, mut a, mut b, mut c) = setup().await;
        registry.remove(&b.conn).await;
        let raw = format!(r#"{{"type":"call","targetId":"{}"}}"#, b.conn.id());

        let outcome = router.dispatch(&a.conn, &raw).await;

        assert_eq!(
            outcome,
            Dispatch::Direct {
                target: b.conn.id().clone(),
                delivered: false
            }
        );
        a.assert_silent();
        b.assert_disconnected();
        c.assert_silent();
        assert_eq!(a.conn.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn malformed_json_has_no_side_effects() {
        let (router, registry, mut a, mut b, mut c) = setup().await;

        let outcome = router.dispatch(&a.conn, "{\"type\":\"offer\"").await;

        assert_eq!(outcome, Dispatch::Dropped(DropReason::Malformed));
        a.assert_silent();
        b.assert_silent();
        c.assert_silent();
        assert_eq!(a.conn.state(), ConnectionState::Open);
        assert_eq!(registry.connection_count().await, 3);
    }

    #[tokio::test]
    async fn array_message_has_no_side_effects() {
        let (router, registry, mut a, mut b, mut c) = setup().await;

        for raw in [
            r#"["offer"]"#.to_string(),
            format!(r#"["call","{}"]"#, b.conn.id()),
        ] {
            let outcome = router.dispatch(&a.conn, &raw).await;
            assert_eq!(outcome, Dispatch::Dropped(DropReason::Malformed), "{raw}");
        }
        a.assert_silent();
        b.assert_silent();
        c.assert_silent();
        assert_eq!(registry.connection_count().await, 3);
    }

    #[tokio::test]
    async fn offer_with_numeric_target_reaches_everyone_but_sender() {
        let (router, _registry, mut a, mut b, mut c) = setup().await;
        let raw = r#"{"type":"offer","targetId":42,"sdp":"x"}"#;

        let outcome = router.dispatch(&a.conn, raw).await;

        assert_eq!(outcome, Dispatch::Broadcast { recipients: 2 });
        b.assert_received(raw);
        c.assert_received(raw);
        a.assert_silent();
    }

    #[tokio::test]
    async fn call_with_object_target_reaches_nobody() {
        let (router, _registry, mut a, mut b, mut c) = setup().await;
        let raw = format!(r#"{{"type":"call","targetId":{{"id":"{}"}}}}"#, b.conn.id());

        let outcome = router.dispatch(&a.conn, &raw).await;

        assert_eq!(outcome, Dispatch::Dropped(DropReason::Malformed));
        a.assert_silent();
        b.assert_silent();
        c.assert_silent();
    }

    #[tokio::test]
    async fn missing_type_is_dropped() {
        let (router, _registry, a, mut b, _c) = setup().await;

        let outcome = router.dispatch(&a.conn, r#"{"sdp":"x"}"#).await;

        assert_eq!(outcome, Dispatch::Dropped(DropReason::MissingType));
        b.assert_silent();
    }

    #[tokio::test]
    async fn unknown_type_is_dropped() {
        let (router, _registry, a, mut b, mut c) = setup().await;
        let raw = format!(r#"{{"type":"chat","targetId":"{}"}}"#, b.conn.id());

        let outcome = router.dispatch(&a.conn, &raw).await;

        assert_eq!(
            outcome,
            Dispatch::Dropped(DropReason::Unrecognized("chat".to_string()))
        );
        b.assert_silent();
        c.assert_silent();
    }

    #[tokio::test]
    async fn relayed_text_is_byte_identical() {
        let (router, _registry, a, mut b, _c) = setup().await;
        let raw = format!(
            "{{ \"targetId\" : \"{}\",\n  \"type\": \"call-accepted\", \"price\": 1.10, \"big\": 12345678901234567890 }}",
            b.conn.id()
        );

        router.dispatch(&a.conn, &raw).await;

        b.assert_received(&raw);
    }
}
