//! Sparse block grid.

use gate_geometry::BlockPos;
use hashbrown::HashMap;

use crate::memory::Block;
use crate::{BlockMaterial, Grid};

/// A sparse grid where every unset cell is air.
#[derive(Debug, Default, Clone)]
pub struct MemoryGrid {
    blocks: HashMap<BlockPos, Block>,
}

impl MemoryGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill an axis-aligned box (inclusive corners).
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, block: Block) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.set_material(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Number of non-air cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Grid for MemoryGrid {
    type Material = Block;

    fn material_at(&self, pos: BlockPos) -> Block {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    fn set_material(&mut self, pos: BlockPos, material: Block) {
        if material == Block::air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, material);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_cells_are_air() {
        let grid = MemoryGrid::new();
        let pos = BlockPos::new(4, -60, 12);
        assert_eq!(grid.material_at(pos), Block::Air);
        assert!(grid.is_passable(pos));
    }

    #[test]
    fn test_set_air_removes_entry() {
        let mut grid = MemoryGrid::new();
        let pos = BlockPos::new(0, 64, 0);
        grid.set_material(pos, Block::Stone);
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_passable(pos));

        grid.set_material(pos, Block::Air);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_fill_inclusive() {
        let mut grid = MemoryGrid::new();
        grid.fill(BlockPos::new(1, 0, 1), BlockPos::new(-1, 0, -1), Block::Stone);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.material_at(BlockPos::new(-1, 0, 1)), Block::Stone);
    }

    #[test]
    fn test_fire_and_field_are_passable() {
        let mut grid = MemoryGrid::new();
        grid.set_material(BlockPos::ORIGIN, Block::Fire);
        grid.set_material(BlockPos::new(0, 1, 0), Block::GateField);
        assert!(grid.is_passable(BlockPos::ORIGIN));
        assert!(grid.is_passable(BlockPos::new(0, 1, 0)));
        assert!(grid.material_at(BlockPos::ORIGIN).is_combustion());
    }
}
