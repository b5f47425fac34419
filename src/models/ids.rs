//! Entity ID generation.
//!
//! Two flavours: content-addressed IDs (SHA256 over the identifying fields,
//! truncated) for entities whose identity is derivable from their content,
//! and random IDs (UUID v4) for entities created fresh every time, such as
//! rounds and pairings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// An opaque entity ID.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId from an existing string.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate an EntityId from identifying fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let result = hasher.finalize();
        let hash = hex::encode(result);
        Self(hash[..16].to_string())
    }

    /// Generate a fresh random EntityId.
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for tournament IDs
pub type TournamentId = EntityId;

/// Type alias for user IDs
pub type UserId = EntityId;

/// Type alias for participant IDs
pub type ParticipantId = EntityId;

/// Type alias for round IDs
pub type RoundId = EntityId;

/// Type alias for pairing IDs
pub type PairingId = EntityId;
