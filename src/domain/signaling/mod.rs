//! Signaling domain module.
//!
//! Classifies inbound messages and decides their recipients. Nothing here
//! touches a transport; delivery lives in the WebSocket adapter.

mod envelope;
mod errors;
mod message_kind;

pub use envelope::{Envelope, Route};
pub use errors::EnvelopeError;
pub use message_kind::MessageKind;
