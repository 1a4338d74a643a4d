//! KCall Signaling - WebSocket relay for peer-to-peer call setup
//!
//! Clients connect over WebSocket, receive a short peer identifier, and
//! exchange call control and media negotiation messages through the relay.
//! Messages are routed by their `type` field and optional `targetId`, and
//! always forwarded as the exact text the sender wrote.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
