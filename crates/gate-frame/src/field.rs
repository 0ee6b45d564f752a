//! Field activation inside a matched frame.

use gate_world::{BlockMaterial, Grid};
use tracing::debug;

use crate::FrameMatch;

/// Fill the frame interior with `field`. Returns the number of cells written.
///
/// Only passable cells are replaced, which after a successful detection is all
/// of them.
pub fn activate_field<G: Grid>(grid: &mut G, frame: &FrameMatch, field: &G::Material) -> usize {
    let mut written = 0;
    for cell in frame.interior() {
        if grid.is_passable(cell) && grid.material_at(cell) != *field {
            grid.set_material(cell, field.clone());
            written += 1;
        }
    }
    debug!("Activated field of frame at {:?} ({written} cells)", frame.core);
    written
}

/// Clear every interior cell that still holds `field`.
pub fn deactivate_field<G: Grid>(grid: &mut G, frame: &FrameMatch, field: &G::Material) -> usize {
    let mut cleared = 0;
    for cell in frame.interior() {
        if grid.material_at(cell) == *field {
            grid.set_material(cell, <G::Material as BlockMaterial>::air());
            cleared += 1;
        }
    }
    debug!("Deactivated field of frame at {:?} ({cleared} cells)", frame.core);
    cleared
}
