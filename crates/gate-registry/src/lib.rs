//! Gate Registry
//!
//! One [`GateRegistry`] exists per loaded world. It is built from a
//! [`GateStore`] when the world loads, written through to that store on every
//! mutation, and dropped when the world unloads.
//!
//! The registry keeps two indexes over live gates:
//!
//! ```text
//!   by_core: BlockPos ──► GateId
//!   gates:   GateId   ──► GateInfo
//! ```
//!
//! Both are updated under a single write lock, so a reader on another thread
//! sees either the old entry or the new one, never half of it.

mod error;
mod gate;
mod registry;
mod store;

pub use error::{RegistryError, RegistryResult, StoreError};
pub use gate::{GateId, GateInfo};
pub use registry::GateRegistry;
pub use store::{GateStore, MemoryStore};
