//! Foundation module - Shared domain primitives.
//!
//! Contains the identifier and time value objects that form the
//! vocabulary of the signaling domain.

mod ids;
mod timestamp;

pub use ids::{PeerId, PEER_ID_LEN};
pub use timestamp::Timestamp;
