//! Host world interfaces.
//!
//! The gate subsystem never owns the world. It reads and writes blocks, looks
//! up realms and moves entities through the traits in this crate, which the
//! host implements. [`memory`] provides a self-contained host used by the
//! runner and by tests.

pub mod memory;
mod realm;

use core::fmt::Debug;

use gate_geometry::BlockPos;

pub use realm::RealmId;

/// Behaviour the gate logic needs from a block material.
pub trait BlockMaterial: Clone + PartialEq + Debug {
    /// The empty material.
    fn air() -> Self;

    /// Fire and anything else that burns an entity standing in it.
    fn is_combustion(&self) -> bool;

    /// Whether the material blocks movement.
    fn is_solid(&self) -> bool;
}

/// Read/write access to one realm's block grid.
pub trait Grid {
    type Material: BlockMaterial;

    fn material_at(&self, pos: BlockPos) -> Self::Material;

    fn is_passable(&self, pos: BlockPos) -> bool {
        !self.material_at(pos).is_solid()
    }

    fn set_material(&mut self, pos: BlockPos, material: Self::Material);
}

/// Resolves realm identifiers to live grids.
///
/// Attaching a realm may create it on first access. That creation is
/// synchronous; an unconfigured realm yields `None` instead of waiting.
pub trait RealmProvider {
    type Grid: Grid;

    fn get_realm(&mut self, id: &RealmId) -> Option<&mut Self::Grid>;
}

/// Entity bookkeeping the teleport transfer needs.
pub trait EntityMover {
    type Entity: Copy + Eq + core::hash::Hash + Debug;

    /// Whether the entity is still alive.
    fn contains(&self, entity: Self::Entity) -> bool;

    /// Move realm, position and velocity in one step.
    ///
    /// Callers check [`EntityMover::contains`] first; moving a dead entity is a
    /// no-op.
    fn move_entity(&mut self, entity: Self::Entity, realm: &RealmId, position: [f64; 3]);
}
