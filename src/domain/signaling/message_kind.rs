//! Closed set of signaling message kinds.

use std::fmt;

/// Kind of an inbound signaling message, taken from its `type` field.
///
/// Call control kinds are delivered to a single peer when a target is given.
/// Media negotiation kinds always go to every other peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `call` - invite a peer to a call.
    Call,
    /// `call-accepted`
    CallAccepted,
    /// `call-rejected`
    CallRejected,
    /// `call-ended`
    CallEnded,
    /// `offer` - session description offer.
    Offer,
    /// `answer` - session description answer.
    Answer,
    /// `candidate` - network candidate.
    Candidate,
    /// Any other `type` value. Accepted on the wire but never routed.
    Unrecognized(String),
}

impl MessageKind {
    /// Classifies a raw `type` value.
    pub fn from_type(value: &str) -> Self {
        match value {
            "call" => MessageKind::Call,
            "call-accepted" => MessageKind::CallAccepted,
            "call-rejected" => MessageKind::CallRejected,
            "call-ended" => MessageKind::CallEnded,
            "offer" => MessageKind::Offer,
            "answer" => MessageKind::Answer,
            "candidate" => MessageKind::Candidate,
            other => MessageKind::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire `type` value.
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Call => "call",
            MessageKind::CallAccepted => "call-accepted",
            MessageKind::CallRejected => "call-rejected",
            MessageKind::CallEnded => "call-ended",
            MessageKind::Offer => "offer",
            MessageKind::Answer => "answer",
            MessageKind::Candidate => "candidate",
            MessageKind::Unrecognized(value) => value.as_str(),
        }
    }

    /// Call control messages, routed to `targetId` when present.
    pub fn is_call_control(&self) -> bool {
        matches!(
            self,
            MessageKind::Call
                | MessageKind::CallAccepted
                | MessageKind::CallRejected
                | MessageKind::CallEnded
        )
    }

    /// Media negotiation messages, always broadcast.
    pub fn is_negotiation(&self) -> bool {
        matches!(
            self,
            MessageKind::Offer | MessageKind::Answer | MessageKind::Candidate
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
