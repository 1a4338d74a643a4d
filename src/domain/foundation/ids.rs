//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of characters in a generated peer identifier.
pub const PEER_ID_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier assigned to a connected peer at admission time.
///
/// Generated identifiers are short lowercase base-36 tokens. Identifiers
/// arriving over the wire (e.g. a `targetId`) are wrapped verbatim, so any
/// string is a valid `PeerId`; it simply may not match a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Creates a new random PeerId.
    ///
    /// Randomness comes from a v4 UUID, folded into base-36 digits.
    pub fn generate() -> Self {
        let mut bits = Uuid::new_v4().as_u128();
        let token = (0..PEER_ID_LEN)
            .map(|_| {
                let digit = (bits % 36) as usize;
                bits /= 36;
                ALPHABET[digit] as char
            })
            .collect();
        Self(token)
    }

    /// Wraps an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
