//! Gate identity records.

use core::fmt;

use gate_geometry::BlockPos;
use gate_world::RealmId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique gate identifier. Never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(Uuid);

impl GateId {
    /// Allocate a fresh random id.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0.as_u128()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        Uuid::from_slice(bytes).ok().map(Self)
    }

    /// Parse the hyphenated text form shown in logs and commands.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::parse_str(text).ok().map(Self)
    }
}

impl fmt::Debug for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GateId({})", self.0)
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A registered gate.
///
/// Only `name` changes after registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateInfo {
    pub id: GateId,
    pub name: String,
    /// Realm the frame stands in.
    pub home_realm: RealmId,
    pub destination_realm: RealmId,
    pub core_position: BlockPos,
}

impl GateInfo {
    /// The coordinate in the destination realm an entity is sent to.
    #[must_use]
    pub const fn destination_anchor(&self) -> BlockPos {
        self.core_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_fresh() {
        let a = GateId::new_v4();
        let b = GateId::new_v4();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_text_and_bytes() {
        let id = GateId::from_u128(0x550e_8400_e29b_41d4_a716_4466_5544_0000);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(GateId::parse(&id.to_string()), Some(id));
        assert_eq!(GateId::from_slice(id.as_bytes()), Some(id));
        assert_eq!(GateId::parse("not-a-gate"), None);
        assert_eq!(GateId::from_slice(&[1, 2, 3]), None);
    }
}
