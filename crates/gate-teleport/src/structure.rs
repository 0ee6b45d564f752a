//! Frame completion and destruction.
//!
//! These run when the host reports block changes near a gate, not per
//! teleport.

use gate_frame::{FrameDetector, FrameMatch, NotAFrame, activate_field, deactivate_field};
use gate_geometry::{BlockPos, Direction, FrameShape};
use gate_registry::{GateInfo, GateRegistry, GateStore, RegistryError};
use gate_world::{Grid, RealmId};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a completed structure did not become a gate.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error(transparent)]
    NotAFrame(#[from] NotAFrame),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Where a frame stands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameSite {
    pub realm: RealmId,
    pub core: BlockPos,
}

impl FrameSite {
    #[must_use]
    pub const fn new(realm: RealmId, core: BlockPos) -> Self {
        Self { realm, core }
    }
}

/// Validate the frame at `site`, register it and light up its field.
///
/// `grid` is the grid of `site.realm`.
pub fn complete_frame<S, G>(
    registry: &GateRegistry<S>,
    grid: &mut G,
    detector: &FrameDetector<G::Material>,
    field: &G::Material,
    site: FrameSite,
    destination: RealmId,
    name: impl Into<String>,
) -> Result<GateInfo, CompletionError>
where
    S: GateStore,
    G: Grid,
{
    let FrameSite { realm, core } = site;
    let frame = detector.detect(&*grid, core)?;
    let gate = registry.register_in(realm, core, destination, name)?;
    activate_field(grid, &frame, field);
    debug!("Completed gate {} facing {}", gate.id, frame.facing.name());
    Ok(gate)
}

/// Unregister the gate at `core` and clear its field on both frame axes.
///
/// `grid` must be the gate's home realm grid.
pub fn retire_gate<S, G>(
    registry: &GateRegistry<S>,
    grid: &mut G,
    shape: FrameShape,
    field: &G::Material,
    core: BlockPos,
) -> Option<GateInfo>
where
    S: GateStore,
    G: Grid,
{
    let gate = match registry.unregister(core) {
        Ok(gate) => gate,
        Err(e) => {
            warn!("Could not retire gate at {core:?}: {e}");
            return None;
        }
    };

    for facing in Direction::FRAME_AXES {
        let frame = FrameMatch {
            facing,
            core,
            shape,
        };
        deactivate_field(grid, &frame, field);
    }

    info!("Retired gate {} '{}'", gate.id, gate.name);
    Some(gate)
}

/// Re-check every gate of `realm` whose frame contains `changed`; retire
/// broken ones.
///
/// `grid` is the grid of `realm`. Returns the retired gates.
pub fn on_frame_block_changed<S, G>(
    registry: &GateRegistry<S>,
    grid: &mut G,
    detector: &FrameDetector<G::Material>,
    field: &G::Material,
    realm: &RealmId,
    changed: BlockPos,
) -> Vec<GateInfo>
where
    S: GateStore,
    G: Grid,
{
    let mut retired = Vec::new();

    for gate in registry.gates() {
        let core = gate.core_position;
        if gate.home_realm != *realm || !frame_contains(detector.shape, core, changed) {
            continue;
        }
        if detector.detect(&*grid, core).is_ok() {
            continue;
        }
        if let Some(gate) = retire_gate(registry, grid, detector.shape, field, core) {
            retired.push(gate);
        }
    }

    retired
}

/// Whether `pos` is inside the outer rectangle of a frame at `core` on
/// either axis.
fn frame_contains(shape: FrameShape, core: BlockPos, pos: BlockPos) -> bool {
    let dy = pos.y - core.y;
    if !(0..=shape.top_y()).contains(&dy) {
        return false;
    }
    let half = shape.half_width();
    let (dx, dz) = (pos.x - core.x, pos.z - core.z);
    (dz == 0 && dx.abs() <= half) || (dx == 0 && dz.abs() <= half)
}
