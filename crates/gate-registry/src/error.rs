//! Registry error types.

use gate_geometry::BlockPos;
use thiserror::Error;

use crate::GateId;

/// Failure reported by a [`crate::GateStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend itself failed (I/O, LMDB, ...).
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored record could not be decoded or encoded.
    #[error("bad gate record {key}: {reason}")]
    Codec { key: String, reason: String },
}

impl StoreError {
    pub fn backend(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(error))
    }
}

/// Registry error type.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A live gate already occupies this core position.
    #[error("gate {existing} is already registered at {core:?}")]
    AlreadyRegistered { core: BlockPos, existing: GateId },

    /// No live gate at this core position.
    #[error("no gate registered at {0:?}")]
    NotFoundAt(BlockPos),

    /// No live gate with this id.
    #[error("no gate with id {0}")]
    NotFound(GateId),

    /// A re-link names a gate that is still live.
    #[error("gate {0} is still live")]
    StillLive(GateId),

    /// The registry's indexes disagree with each other.
    #[error("registry corrupted: {0}")]
    Corrupted(String),

    /// Write-through persistence failed; the table was left unchanged.
    #[error("persistence failed: {0}")]
    Storage(#[from] StoreError),
}

impl RegistryError {
    /// Whether this is a caller mistake rather than an environment problem.
    #[must_use]
    pub const fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRegistered { .. } | Self::NotFoundAt(_) | Self::NotFound(_) | Self::StillLive(_)
        )
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
