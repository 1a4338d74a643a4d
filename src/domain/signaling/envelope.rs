//! Parsed view of an inbound signaling message and its routing decision.
//!
//! Only `type` and `targetId` are read. Every other field is opaque and is
//! never re-serialized: relays always forward the original text.

use serde_json::Value;

use crate::domain::foundation::PeerId;

use super::errors::EnvelopeError;
use super::message_kind::MessageKind;

/// Where a message should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Deliver to exactly this peer, if it is still connected.
    Direct(PeerId),
    /// Deliver to every connected peer except the sender.
    Broadcast,
    /// Do not deliver at all.
    Ignore,
}

/// Parsed structure of one inbound message.
///
/// Built per message and discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    kind: MessageKind,
    target_id: Option<PeerId>,
}

impl Envelope {
    /// Builds an envelope directly from its parts.
    pub fn new(kind: MessageKind, target_id: Option<PeerId>) -> Self {
        Self { kind, target_id }
    }

    /// Parses raw message text.
    ///
    /// An empty or null `targetId` is treated the same as an absent one.
    /// A repeated key takes its last value.
    ///
    /// # Errors
    ///
    /// - `EnvelopeError::Malformed` if the text is not JSON
    /// - `EnvelopeError::NotAnObject` if the top-level value is not an object
    /// - `EnvelopeError::MissingType` if `type` is absent or null
    /// - `EnvelopeError::InvalidField` if `type` is not a string, or a call
    ///   control message has a `targetId` no peer can be addressed by
    pub fn parse(raw: &str) -> Result<Self, EnvelopeError> {
        let Value::Object(fields) = serde_json::from_str::<Value>(raw)? else {
            return Err(EnvelopeError::NotAnObject);
        };

        let kind = match fields.get("type") {
            None | Some(Value::Null) => return Err(EnvelopeError::MissingType),
            Some(Value::String(kind)) => MessageKind::from_type(kind),
            Some(_) => return Err(EnvelopeError::InvalidField("type")),
        };

        // Only call control is routed by target.
        let target_id = match fields.get("targetId") {
            None | Some(Value::Null) => None,
            Some(Value::String(target)) if target.is_empty() => None,
            Some(Value::String(target)) => Some(PeerId::new(target.as_str())),
            Some(_) if kind.is_call_control() => {
                return Err(EnvelopeError::InvalidField("targetId"));
            }
            Some(_) => None,
        };

        Ok(Self { kind, target_id })
    }

    pub fn kind(&self) -> &MessageKind {
        &self.kind
    }

    pub fn target_id(&self) -> Option<&PeerId> {
        self.target_id.as_ref()
    }

    /// Decides the recipient set for this message.
    ///
    /// - call control with a target: that peer only
    /// - call control without a target: everyone but the sender
    /// - negotiation: everyone but the sender, any target is ignored
    /// - unrecognized: nobody
    pub fn route(&self) -> Route {
        if self.kind.is_call_control() {
            match &self.target_id {
                Some(target) => Route::Direct(target.clone()),
                None => Route::Broadcast,
            }
        } else if self.kind.is_negotiation() {
            Route::Broadcast
        } else {
            Route::Ignore
        }
    }
}
