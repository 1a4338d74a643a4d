//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Transport Ports
//!
//! - `PeerSink` - Outbound message channel of one connected peer

mod peer_sink;

pub use peer_sink::{DeliveryError, PeerSink};
