use serde::{Deserialize, Serialize};

use crate::BlockMaterial;

/// Block materials of the in-memory host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Block {
    #[default]
    Air,
    Fire,
    Stone,
    /// The designated frame material.
    GateFrame,
    /// The block placed at a frame's core.
    GateCore,
    /// The active field filling a linked frame.
    GateField,
}

impl BlockMaterial for Block {
    fn air() -> Self {
        Self::Air
    }

    fn is_combustion(&self) -> bool {
        matches!(self, Self::Fire)
    }

    fn is_solid(&self) -> bool {
        matches!(self, Self::Stone | Self::GateFrame | Self::GateCore)
    }
}
