//! Domain layer containing routing rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (peer identifiers, timestamps)
//! - `signaling` - Message envelope, message kinds, and routing decisions

pub mod foundation;
pub mod signaling;
