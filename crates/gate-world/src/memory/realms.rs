//! Lazily attached realms.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::memory::MemoryGrid;
use crate::{RealmId, RealmProvider};

/// Realm table of the in-memory host.
///
/// A realm must be configured before it can be attached. The first
/// [`RealmProvider::get_realm`] call for a configured realm creates its grid.
#[derive(Debug, Default)]
pub struct MemoryRealms {
    configured: HashSet<RealmId>,
    attached: HashMap<RealmId, MemoryGrid>,
}

impl MemoryRealms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the given realms configured (but not yet attached).
    #[must_use]
    pub fn with_configured(ids: impl IntoIterator<Item = RealmId>) -> Self {
        Self {
            configured: ids.into_iter().collect(),
            attached: HashMap::new(),
        }
    }

    pub fn configure(&mut self, id: RealmId) {
        self.configured.insert(id);
    }

    /// Forget a realm's configuration. An attached grid is dropped with it.
    pub fn unconfigure(&mut self, id: &RealmId) {
        self.configured.remove(id);
        if self.attached.remove(id).is_some() {
            info!("Detached realm {id}");
        }
    }

    #[must_use]
    pub fn is_attached(&self, id: &RealmId) -> bool {
        self.attached.contains_key(id)
    }

    /// Read-only view of an attached realm. Does not attach.
    #[must_use]
    pub fn grid(&self, id: &RealmId) -> Option<&MemoryGrid> {
        self.attached.get(id)
    }

    /// Ids of all attached realms.
    pub fn attached(&self) -> impl Iterator<Item = &RealmId> {
        self.attached.keys()
    }
}

impl RealmProvider for MemoryRealms {
    type Grid = MemoryGrid;

    fn get_realm(&mut self, id: &RealmId) -> Option<&mut MemoryGrid> {
        if !self.configured.contains(id) {
            debug!("Realm {id} is not configured");
            return None;
        }

        Some(self.attached.entry(id.clone()).or_insert_with(|| {
            info!("Attached realm {id}");
            MemoryGrid::new()
        }))
    }
}
