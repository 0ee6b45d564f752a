//! In-memory host: sparse grids, lazily attached realms and an entity table.

mod block;
mod entity;
mod grid;
mod realms;

pub use block::Block;
pub use entity::{Entity, EntityState, EntityTable};
pub use grid::MemoryGrid;
pub use realms::MemoryRealms;
