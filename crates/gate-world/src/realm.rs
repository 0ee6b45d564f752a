use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque realm identifier, e.g. `"overworld"` or `"gate:pocket"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RealmId(String);

impl RealmId {
    pub const OVERWORLD: &'static str = "overworld";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn overworld() -> Self {
        Self::new(Self::OVERWORLD)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Realm({})", self.0)
    }
}

impl fmt::Display for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RealmId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
