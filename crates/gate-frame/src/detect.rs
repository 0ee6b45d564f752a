//! Border and interior checks for a candidate core.

use core::fmt;

use gate_geometry::{BlockPos, Direction, FrameShape};
use gate_world::Grid;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

/// A frame that passed detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameMatch {
    /// Facing the frame was matched with.
    pub facing: Direction,
    pub core: BlockPos,
    pub shape: FrameShape,
}

impl FrameMatch {
    /// The frame's right vector.
    #[must_use]
    pub const fn right(&self) -> Direction {
        self.facing.clockwise()
    }

    #[must_use]
    pub fn border(&self) -> Vec<BlockPos> {
        self.shape.border(self.right(), self.core)
    }

    #[must_use]
    pub fn interior(&self) -> Vec<BlockPos> {
        self.shape.interior(self.right(), self.core)
    }
}

/// Why a cell rejected a facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// Border cell is not frame material.
    WrongMaterial,
    /// Interior cell is solid.
    Obstructed,
}

/// First offending cell for one facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacingMismatch {
    pub facing: Direction,
    pub cell: BlockPos,
    pub reason: Mismatch,
}

/// No candidate facing produced a complete frame.
///
/// This is an ordinary negative answer while a player is still building.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub struct NotAFrame {
    pub core: BlockPos,
    pub attempts: SmallVec<[FacingMismatch; 2]>,
}

impl fmt::Display for NotAFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no gate frame at {:?}", self.core)?;
        for attempt in &self.attempts {
            write!(
                f,
                "; {}: {:?} at {:?}",
                attempt.facing.name(),
                attempt.reason,
                attempt.cell
            )?;
        }
        Ok(())
    }
}

/// Detector configured with a frame shape, material and candidate facings.
#[derive(Clone, Debug)]
pub struct FrameDetector<M> {
    pub shape: FrameShape,
    pub frame_material: M,
    pub facings: SmallVec<[Direction; 2]>,
}

impl<M: PartialEq> FrameDetector<M> {
    /// Default shape, trying both frame axes.
    #[must_use]
    pub fn new(frame_material: M) -> Self {
        Self {
            shape: FrameShape::DEFAULT,
            frame_material,
            facings: SmallVec::from_buf(Direction::FRAME_AXES),
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: FrameShape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_facings(mut self, facings: impl IntoIterator<Item = Direction>) -> Self {
        self.facings = facings.into_iter().collect();
        self
    }

    /// Check every candidate facing in order; the first complete one wins.
    pub fn detect<G>(&self, grid: &G, core: BlockPos) -> Result<FrameMatch, NotAFrame>
    where
        G: Grid<Material = M>,
    {
        let mut attempts = SmallVec::new();

        for &facing in &self.facings {
            match self.check_facing(grid, core, facing) {
                Ok(found) => {
                    trace!("Frame at {core:?} matched facing {}", facing.name());
                    return Ok(found);
                }
                Err(mismatch) => attempts.push(mismatch),
            }
        }

        trace!("No frame at {core:?}: {attempts:?}");
        Err(NotAFrame { core, attempts })
    }

    fn check_facing<G>(
        &self,
        grid: &G,
        core: BlockPos,
        facing: Direction,
    ) -> Result<FrameMatch, FacingMismatch>
    where
        G: Grid<Material = M>,
    {
        let right = facing.clockwise();
        let mismatch = |cell, reason| FacingMismatch {
            facing,
            cell,
            reason,
        };

        for cell in self.shape.border(right, core) {
            if grid.material_at(cell) != self.frame_material {
                return Err(mismatch(cell, Mismatch::WrongMaterial));
            }
        }

        for cell in self.shape.interior(right, core) {
            if !grid.is_passable(cell) {
                return Err(mismatch(cell, Mismatch::Obstructed));
            }
        }

        Ok(FrameMatch {
            facing,
            core,
            shape: self.shape,
        })
    }
}

/// Detect a default-shaped frame of `frame_material` around `core`.
pub fn detect<G>(
    grid: &G,
    core: BlockPos,
    facings: &[Direction],
    frame_material: G::Material,
) -> Result<FrameMatch, NotAFrame>
where
    G: Grid,
{
    FrameDetector::new(frame_material)
        .with_facings(facings.iter().copied())
        .detect(grid, core)
}
