//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `websocket` - Signaling transport, connection registry, and routing

pub mod websocket;
