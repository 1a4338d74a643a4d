//! Signaling-specific error types.

use thiserror::Error;

/// Errors raised while turning raw inbound text into an [`Envelope`].
///
/// [`Envelope`]: super::Envelope
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Not valid JSON.
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON whose top-level value is not an object.
    #[error("Message is not a JSON object")]
    NotAnObject,

    /// JSON object without a `type` field, or with a null one.
    #[error("Message has no type field")]
    MissingType,

    /// A routing field has a shape the relay cannot use.
    #[error("Message field {0} has an unusable value")]
    InvalidField(&'static str),
}
