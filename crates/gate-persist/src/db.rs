//! LMDB database wrapper for gate records.

use std::path::{Path, PathBuf};

use gate_registry::{GateId, GateInfo, GateStore, StoreError};
use heed::{Database, Env, EnvOpenOptions, types::Bytes};

/// On-disk gate table for one world.
pub struct GateDb {
    env: Env,
    db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl GateDb {
    /// Open or create the gate database at `path`.
    ///
    /// # Errors
    /// Returns an error if the directory or database cannot be created.
    ///
    /// # Safety
    /// heed's open is unsafe because an LMDB environment must not be opened
    /// twice in one process. Each world opens its own directory exactly once.
    #[allow(unsafe_code)]
    pub fn open(path: impl AsRef<Path>) -> heed::Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(heed::Error::Io)?;

        // SAFETY: one environment per world directory, opened once per load.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(64 * 1024 * 1024)
                .max_dbs(1)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let db = env.create_database(&mut wtxn, Some("gates"))?;
        wtxn.commit()?;

        tracing::debug!("Opened gate database at {}", path.display());
        Ok(Self {
            env,
            db,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(key: &[u8], bytes: &[u8]) -> Result<GateInfo, StoreError> {
        let codec_error = |reason: String| StoreError::Codec {
            key: format_key(key),
            reason,
        };

        let gate: GateInfo = bincode::deserialize(bytes).map_err(|e| codec_error(e.to_string()))?;
        if gate.id.as_bytes() != key {
            return Err(codec_error(format!("record holds id {}", gate.id)));
        }
        Ok(gate)
    }
}

impl GateStore for GateDb {
    fn load_all(&self) -> Result<Vec<GateInfo>, StoreError> {
        let rtxn = self.env.read_txn().map_err(StoreError::backend)?;

        let mut gates = Vec::new();
        for entry in self.db.iter(&rtxn).map_err(StoreError::backend)? {
            let (key, bytes) = entry.map_err(StoreError::backend)?;
            match Self::decode(key, bytes) {
                Ok(gate) => gates.push(gate),
                // One bad record should not take the whole world's gates down.
                Err(e) => tracing::error!("Skipping gate record: {e}"),
            }
        }

        tracing::trace!("Read {} gate record(s) from {}", gates.len(), self.path.display());
        Ok(gates)
    }

    fn save(&self, gate: &GateInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(gate).map_err(|e| StoreError::Codec {
            key: gate.id.to_string(),
            reason: e.to_string(),
        })?;

        let mut wtxn = self.env.write_txn().map_err(StoreError::backend)?;
        self.db
            .put(&mut wtxn, gate.id.as_bytes(), &bytes)
            .map_err(StoreError::backend)?;
        wtxn.commit().map_err(StoreError::backend)?;

        tracing::trace!("Persisted gate {}", gate.id);
        Ok(())
    }

    fn remove(&self, id: GateId) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(StoreError::backend)?;
        let deleted = self
            .db
            .delete(&mut wtxn, id.as_bytes())
            .map_err(StoreError::backend)?;
        wtxn.commit().map_err(StoreError::backend)?;

        if deleted {
            tracing::trace!("Deleted gate {id}");
        }
        Ok(deleted)
    }
}

/// Render a raw key for error messages.
fn format_key(key: &[u8]) -> String {
    uuid::Uuid::from_slice(key).map_or_else(|_| format!("{key:02x?}"), |uuid| uuid.to_string())
}
