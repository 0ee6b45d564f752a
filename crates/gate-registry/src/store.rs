//! Write-through storage seam.

use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::{GateId, GateInfo, StoreError};

/// Durable storage for one world's gates. One record per [`GateInfo`].
pub trait GateStore: Send + Sync {
    /// Every stored gate, in no particular order.
    fn load_all(&self) -> Result<Vec<GateInfo>, StoreError>;

    /// Insert or replace the record for `gate.id`.
    fn save(&self, gate: &GateInfo) -> Result<(), StoreError>;

    /// Delete a record. Returns whether it existed.
    fn remove(&self, id: GateId) -> Result<bool, StoreError>;
}

/// Volatile store, for tests and worlds without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<GateId, GateInfo>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save`/`remove` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    #[must_use]
    pub fn get(&self, id: GateId) -> Option<GateInfo> {
        self.records.lock().get(&id).cloned()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::backend(std::io::Error::other(
                "memory store is read-only",
            )));
        }
        Ok(())
    }
}

impl GateStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<GateInfo>, StoreError> {
        Ok(self.records.lock().values().cloned().collect())
    }

    fn save(&self, gate: &GateInfo) -> Result<(), StoreError> {
        self.check_writable()?;
        self.records.lock().insert(gate.id, gate.clone());
        Ok(())
    }

    fn remove(&self, id: GateId) -> Result<bool, StoreError> {
        self.check_writable()?;
        Ok(self.records.lock().remove(&id).is_some())
    }
}

impl<S: GateStore + ?Sized> GateStore for std::sync::Arc<S> {
    fn load_all(&self) -> Result<Vec<GateInfo>, StoreError> {
        (**self).load_all()
    }

    fn save(&self, gate: &GateInfo) -> Result<(), StoreError> {
        (**self).save(gate)
    }

    fn remove(&self, id: GateId) -> Result<bool, StoreError> {
        (**self).remove(id)
    }
}
