//! Party Identity
//!
//! Stable identifiers shared by villagers and external players.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a villager or an external player.
///
/// The nil UUID is reserved as [`EMPTY_ID`], meaning "no relationship".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PartyId(pub Uuid);

/// Sentinel identity for "no partner" / "nobody".
pub const EMPTY_ID: PartyId = PartyId(Uuid::nil());

impl PartyId {
    /// Generate a fresh random identity.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an identity from raw bytes (wire format).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// True for the [`EMPTY_ID`] sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for PartyId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
