//! The per-world gate table.

use gate_geometry::BlockPos;
use gate_world::RealmId;
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::{GateId, GateInfo, GateStore, RegistryError, RegistryResult};

#[derive(Debug, Default)]
struct Table {
    by_core: HashMap<BlockPos, GateId>,
    gates: HashMap<GateId, GateInfo>,
    /// Unregistered gates of this session, kept so they can be re-linked.
    retired: HashMap<GateId, GateInfo>,
}

impl Table {
    fn knows(&self, id: GateId) -> bool {
        self.gates.contains_key(&id) || self.retired.contains_key(&id)
    }

    fn insert(&mut self, gate: GateInfo) {
        self.by_core.insert(gate.core_position, gate.id);
        self.gates.insert(gate.id, gate);
    }

    fn resolve(&self, core: BlockPos) -> RegistryResult<Option<&GateInfo>> {
        let Some(id) = self.by_core.get(&core) else {
            return Ok(None);
        };
        match self.gates.get(id) {
            Some(gate) if gate.core_position == core => Ok(Some(gate)),
            Some(gate) => Err(RegistryError::Corrupted(format!(
                "{core:?} maps to gate {id} whose core is {:?}",
                gate.core_position
            ))),
            None => Err(RegistryError::Corrupted(format!(
                "{core:?} maps to unknown gate {id}"
            ))),
        }
    }
}

/// Registry of one world's gates.
///
/// Mutations happen on the simulation thread; lookups may come from anywhere.
pub struct GateRegistry<S> {
    store: S,
    table: RwLock<Table>,
}

impl<S: GateStore> GateRegistry<S> {
    /// Build the table from everything in `store`.
    ///
    /// A stored record whose core collides with an earlier one (by id order)
    /// is reported and left out of the live table.
    pub fn load(store: S) -> RegistryResult<Self> {
        let mut records = store.load_all()?;
        records.sort_by_key(|gate| gate.id);

        let mut table = Table::default();
        for gate in records {
            if let Some(existing) = table.by_core.get(&gate.core_position) {
                error!(
                    "Stored gate {} at {:?} collides with gate {existing}; not loading it",
                    gate.id, gate.core_position
                );
                continue;
            }
            table.insert(gate);
        }

        info!("Loaded {} gate(s)", table.gates.len());
        Ok(Self {
            store,
            table: RwLock::new(table),
        })
    }

    /// Drop the table and hand back the store.
    pub fn unload(self) -> S {
        let count = self.table.read().gates.len();
        info!("Unloading gate registry ({count} gate(s))");
        self.store
    }

    /// Register a completed overworld frame under a fresh id.
    pub fn register(
        &self,
        core: BlockPos,
        destination_realm: RealmId,
        name: impl Into<String>,
    ) -> RegistryResult<GateInfo> {
        self.register_in(RealmId::overworld(), core, destination_realm, name)
    }

    /// Register a completed frame standing in `home_realm`.
    ///
    /// Cores are unique across realms: one world has one gate per coordinate.
    pub fn register_in(
        &self,
        home_realm: RealmId,
        core: BlockPos,
        destination_realm: RealmId,
        name: impl Into<String>,
    ) -> RegistryResult<GateInfo> {
        let mut table = self.table.write();

        if let Some(&existing) = table.by_core.get(&core) {
            return Err(RegistryError::AlreadyRegistered { core, existing });
        }

        let id = loop {
            let id = GateId::new_v4();
            if !table.knows(id) {
                break id;
            }
        };

        let gate = GateInfo {
            id,
            name: name.into(),
            home_realm,
            destination_realm,
            core_position: core,
        };

        self.store.save(&gate)?;
        table.insert(gate.clone());

        info!(
            "Registered gate {} '{}' at {core:?} in {} -> {}",
            gate.id, gate.name, gate.home_realm, gate.destination_realm
        );
        Ok(gate)
    }

    /// Bring an unregistered gate back under its original id and core.
    pub fn relink(&self, id: GateId) -> RegistryResult<GateInfo> {
        let mut table = self.table.write();

        if table.gates.contains_key(&id) {
            return Err(RegistryError::StillLive(id));
        }
        let Some(gate) = table.retired.get(&id).cloned() else {
            return Err(RegistryError::NotFound(id));
        };
        if let Some(&existing) = table.by_core.get(&gate.core_position) {
            return Err(RegistryError::AlreadyRegistered {
                core: gate.core_position,
                existing,
            });
        }

        self.store.save(&gate)?;
        table.retired.remove(&id);
        table.insert(gate.clone());

        info!("Re-linked gate {id} '{}' at {:?}", gate.name, gate.core_position);
        Ok(gate)
    }

    /// A broken index is logged and reads as no gate.
    #[must_use]
    pub fn lookup_by_core(&self, core: BlockPos) -> Option<GateInfo> {
        self.checked_lookup_by_core(core).unwrap_or_else(|e| {
            error!("Gate lookup at {core:?} failed: {e}");
            None
        })
    }

    /// Like [`GateRegistry::lookup_by_core`], but reports a broken index
    /// instead of hiding it.
    pub fn checked_lookup_by_core(&self, core: BlockPos) -> RegistryResult<Option<GateInfo>> {
        self.table.read().resolve(core).map(|gate| gate.cloned())
    }

    #[must_use]
    pub fn lookup_by_id(&self, id: GateId) -> Option<GateInfo> {
        self.table.read().gates.get(&id).cloned()
    }

    /// Change a gate's display name. Id, realm and position are untouched.
    pub fn rename(&self, id: GateId, new_name: impl Into<String>) -> RegistryResult<()> {
        let mut table = self.table.write();

        let Some(gate) = table.gates.get(&id) else {
            return Err(RegistryError::NotFound(id));
        };
        let renamed = GateInfo {
            name: new_name.into(),
            ..gate.clone()
        };

        self.store.save(&renamed)?;
        debug!("Renamed gate {id} '{}' -> '{}'", gate.name, renamed.name);
        table.gates.insert(id, renamed);
        Ok(())
    }

    /// Remove the gate anchored at `core` and return it.
    pub fn unregister(&self, core: BlockPos) -> RegistryResult<GateInfo> {
        let mut table = self.table.write();

        let Some(gate) = table.resolve(core)?.cloned() else {
            return Err(RegistryError::NotFoundAt(core));
        };

        self.store.remove(gate.id)?;
        table.by_core.remove(&core);
        table.gates.remove(&gate.id);
        table.retired.insert(gate.id, gate.clone());

        info!("Unregistered gate {} '{}' at {core:?}", gate.id, gate.name);
        Ok(gate)
    }

    /// Snapshot of all live gates, ordered by core position.
    #[must_use]
    pub fn gates(&self) -> Vec<GateInfo> {
        let mut gates: Vec<_> = self.table.read().gates.values().cloned().collect();
        gates.sort_by_key(|gate| gate.core_position);
        gates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().gates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.read().gates.is_empty()
    }

    /// Verify core <-> id is a bijection over live gates.
    pub fn check_invariants(&self) -> RegistryResult<()> {
        let table = self.table.read();

        if table.by_core.len() != table.gates.len() {
            return Err(RegistryError::Corrupted(format!(
                "{} core entries for {} gates",
                table.by_core.len(),
                table.gates.len()
            )));
        }
        for &core in table.by_core.keys() {
            table.resolve(core)?;
        }
        if let Some(id) = table.gates.keys().find(|id| table.retired.contains_key(*id)) {
            return Err(RegistryError::Corrupted(format!(
                "gate {id} is both live and retired"
            )));
        }
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::MemoryStore;

    fn pocket() -> RealmId {
        RealmId::new("gate:pocket")
    }

    fn registry() -> GateRegistry<Arc<MemoryStore>> {
        GateRegistry::load(Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry();
        let core = BlockPos::new(0, 64, 0);

        let gate = registry.register(core, pocket(), "Gate1").unwrap();
        assert_eq!(gate.name, "Gate1");
        assert_eq!(gate.core_position, core);
        assert_eq!(gate.destination_realm, pocket());
        assert_eq!(gate.home_realm, RealmId::overworld());

        assert_eq!(registry.lookup_by_core(core), Some(gate.clone()));
        assert_eq!(registry.lookup_by_id(gate.id), Some(gate.clone()));
        assert_eq!(registry.store().get(gate.id), Some(gate));
    }

    #[test]
    fn test_duplicate_core_is_rejected() {
        let registry = registry();
        let core = BlockPos::new(5, 70, 5);
        let first = registry.register(core, pocket(), "A").unwrap();

        let err = registry.register(core, pocket(), "B").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AlreadyRegistered { existing, .. } if existing == first.id
        ));
        assert!(err.is_misuse());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup_by_core(core).unwrap().name, "A");
        assert_eq!(registry.store().len(), 1);
    }

    #[test]
    fn test_register_in_other_realm() {
        let registry = registry();
        let core = BlockPos::new(0, 64, 0);
        let home = RealmId::new("gate:pocket");

        let gate = registry
            .register_in(home.clone(), core, RealmId::overworld(), "Way Back")
            .unwrap();
        assert_eq!(gate.home_realm, home);
        assert_eq!(registry.store().get(gate.id), Some(gate.clone()));

        // The core index spans realms.
        assert!(matches!(
            registry.register(core, pocket(), "Clash"),
            Err(RegistryError::AlreadyRegistered { .. })
        ));
    }

    #[test]
    fn test_unregister_absent() {
        let registry = registry();
        registry.register(BlockPos::ORIGIN, pocket(), "A").unwrap();

        let err = registry.unregister(BlockPos::new(1, 1, 1)).unwrap_err();
        assert!(matches!(err, RegistryError::NotFoundAt(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rebuild_gets_new_id() {
        let registry = registry();
        let core = BlockPos::new(2, 64, 2);
        let first = registry.register(core, pocket(), "Gate").unwrap();
        let removed = registry.unregister(core).unwrap();
        assert_eq!(removed, first);
        assert!(registry.lookup_by_id(first.id).is_none());
        assert!(registry.store().get(first.id).is_none());

        let second = registry.register(core, pocket(), "Gate").unwrap();
        assert_ne!(second.id, first.id);
    }

    #[test]
    fn test_relink_restores_id() {
        let registry = registry();
        let core = BlockPos::new(2, 64, 2);
        let first = registry.register(core, pocket(), "Gate").unwrap();

        assert!(matches!(
            registry.relink(first.id),
            Err(RegistryError::StillLive(_))
        ));

        registry.unregister(core).unwrap();
        let again = registry.relink(first.id).unwrap();
        assert_eq!(again, first);
        assert_eq!(registry.lookup_by_core(core), Some(first.clone()));
        assert!(matches!(
            registry.relink(GateId::new_v4()),
            Err(RegistryError::NotFound(_))
        ));
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_relink_blocked_by_new_gate() {
        let registry = registry();
        let core = BlockPos::ORIGIN;
        let first = registry.register(core, pocket(), "Old").unwrap();
        registry.unregister(core).unwrap();
        let second = registry.register(core, pocket(), "New").unwrap();

        let err = registry.relink(first.id).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::AlreadyRegistered { existing, .. } if existing == second.id
        ));
    }

    #[test]
    fn test_rename_preserves_identity() {
        let registry = registry();
        let core = BlockPos::new(-3, 12, 40);
        let gate = registry.register(core, pocket(), "Before").unwrap();

        registry.rename(gate.id, "After").unwrap();
        let renamed = registry.lookup_by_id(gate.id).unwrap();
        assert_eq!(renamed.name, "After");
        assert_eq!(renamed.id, gate.id);
        assert_eq!(renamed.core_position, core);
        assert_eq!(renamed.destination_realm, gate.destination_realm);
        assert_eq!(registry.store().get(gate.id).unwrap().name, "After");

        let missing = GateId::new_v4();
        assert!(matches!(
            registry.rename(missing, "x"),
            Err(RegistryError::NotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_failed_persist_leaves_table_unchanged() {
        let registry = registry();
        let gate = registry.register(BlockPos::ORIGIN, pocket(), "Kept").unwrap();
        registry.store().set_fail_writes(true);

        let err = registry
            .register(BlockPos::new(9, 9, 9), pocket(), "Lost")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Storage(_)));
        assert!(!err.is_misuse());
        assert!(registry.lookup_by_core(BlockPos::new(9, 9, 9)).is_none());

        assert!(registry.rename(gate.id, "Changed").is_err());
        assert_eq!(registry.lookup_by_id(gate.id).unwrap().name, "Kept");

        assert!(registry.unregister(BlockPos::ORIGIN).is_err());
        assert_eq!(registry.lookup_by_core(BlockPos::ORIGIN), Some(gate));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reload_from_store() {
        let store = Arc::new(MemoryStore::new());
        let gate = {
            let registry = GateRegistry::load(Arc::clone(&store)).unwrap();
            let gate = registry.register(BlockPos::new(1, 2, 3), pocket(), "Kept").unwrap();
            registry.unload();
            gate
        };

        let registry = GateRegistry::load(store).unwrap();
        assert_eq!(registry.lookup_by_core(BlockPos::new(1, 2, 3)), Some(gate));
    }

    #[test]
    fn test_colliding_records_are_skipped_on_load() {
        let store = MemoryStore::new();
        let core = BlockPos::new(4, 4, 4);
        let low = GateInfo {
            id: GateId::from_u128(1),
            name: "low".into(),
            home_realm: RealmId::overworld(),
            destination_realm: pocket(),
            core_position: core,
        };
        let high = GateInfo {
            id: GateId::from_u128(2),
            name: "high".into(),
            ..low.clone()
        };
        store.save(&high).unwrap();
        store.save(&low).unwrap();

        let registry = GateRegistry::load(store).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup_by_core(core).unwrap().name, "low");
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_corruption_is_reported() {
        let registry = registry();
        let core = BlockPos::ORIGIN;
        let gate = registry.register(core, pocket(), "A").unwrap();

        registry
            .table
            .write()
            .gates
            .get_mut(&gate.id)
            .unwrap()
            .core_position = BlockPos::new(7, 7, 7);

        assert!(matches!(
            registry.checked_lookup_by_core(core),
            Err(RegistryError::Corrupted(_))
        ));
        assert!(registry.lookup_by_core(core).is_none());
        assert!(registry.check_invariants().is_err());
    }

    #[test]
    fn test_readers_never_see_partial_entries() {
        let registry = Arc::new(registry());

        std::thread::scope(|scope| {
            let reader = Arc::clone(&registry);
            scope.spawn(move || {
                for _ in 0..2_000 {
                    for gate in reader.gates() {
                        assert_eq!(gate.name, format!("gate-{}", gate.core_position.x));
                        assert_eq!(gate.destination_realm, pocket());
                    }
                }
            });

            for x in 0..200 {
                let core = BlockPos::new(x, 64, 0);
                registry.register(core, pocket(), format!("gate-{x}")).unwrap();
                if x % 3 == 0 {
                    registry.unregister(core).unwrap();
                }
            }
        });

        registry.check_invariants().unwrap();
    }
}
