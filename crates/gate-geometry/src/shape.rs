//! Frame shape and border enumeration.

use serde::{Deserialize, Serialize};

use crate::{BlockPos, Direction};

/// Offset from a gate's core to the field cell entities step into.
pub const FIELD_OFFSET: BlockPos = BlockPos::new(0, 1, 0);

/// Interior dimensions of a gate frame.
///
/// The outer rectangle adds one border cell on every side. With an even inner
/// width the border columns sit at `inner_width / 2 + 1`, so the outer width is
/// always odd and centred on the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameShape {
    pub inner_width: i32,
    pub inner_height: i32,
}

impl Default for FrameShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FrameShape {
    /// 3 x 4 interior, 5 x 6 outer.
    pub const DEFAULT: Self = Self {
        inner_width: 3,
        inner_height: 4,
    };

    #[must_use]
    pub const fn new(inner_width: i32, inner_height: i32) -> Self {
        Self {
            inner_width,
            inner_height,
        }
    }

    /// Local `dx` of the left and right border columns (as `-h` and `h`).
    #[must_use]
    pub const fn half_width(self) -> i32 {
        self.inner_width / 2 + 1
    }

    /// Local `dy` of the top border row.
    #[must_use]
    pub const fn top_y(self) -> i32 {
        self.inner_height + 1
    }

    #[must_use]
    pub const fn outer_width(self) -> i32 {
        2 * self.half_width() + 1
    }

    #[must_use]
    pub const fn outer_height(self) -> i32 {
        self.top_y() + 1
    }

    /// Border membership in local coordinates. The core `(0, 0)` matches too;
    /// callers exclude it.
    #[must_use]
    pub const fn is_border(self, dx: i32, dy: i32) -> bool {
        let half = self.half_width();
        dy == 0 || dy == self.top_y() || dx == -half || dx == half
    }

    /// Number of cells [`FrameShape::border`] yields.
    #[must_use]
    pub const fn border_len(self) -> usize {
        (2 * (self.outer_width() + self.outer_height()) - 4 - 1) as usize
    }

    /// Every border cell of the frame anchored at `core`, core excluded.
    ///
    /// Ordered by `dy` then `dx`, both ascending.
    #[must_use]
    pub fn border(self, facing_right: Direction, core: BlockPos) -> Vec<BlockPos> {
        self.cells(facing_right, core, |dx, dy| {
            self.is_border(dx, dy) && (dx, dy) != (0, 0)
        })
    }

    /// Every cell strictly inside the border.
    #[must_use]
    pub fn interior(self, facing_right: Direction, core: BlockPos) -> Vec<BlockPos> {
        self.cells(facing_right, core, |dx, dy| !self.is_border(dx, dy))
    }

    /// Project a local `(dx, dy)` offset into world space.
    #[must_use]
    pub const fn project(facing_right: Direction, core: BlockPos, dx: i32, dy: i32) -> BlockPos {
        core.offset(facing_right, dx).up(dy)
    }

    fn cells(
        self,
        facing_right: Direction,
        core: BlockPos,
        keep: impl Fn(i32, i32) -> bool,
    ) -> Vec<BlockPos> {
        let half = self.half_width();
        let mut out = Vec::new();
        for dy in 0..=self.top_y() {
            for dx in -half..=half {
                if keep(dx, dy) {
                    out.push(Self::project(facing_right, core, dx, dy));
                }
            }
        }
        out
    }
}

/// Border cells of a default-shaped frame. See [`FrameShape::border`].
#[must_use]
pub fn collect_frame_border(facing_right: Direction, core: BlockPos) -> Vec<BlockPos> {
    FrameShape::DEFAULT.border(facing_right, core)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_outer_dimensions() {
        let shape = FrameShape::DEFAULT;
        assert_eq!(shape.outer_width(), 5);
        assert_eq!(shape.outer_height(), 6);
        assert_eq!(shape.border_len(), 17);
    }

    #[test]
    fn test_border_count_matches_rectangle_perimeter() {
        let border = collect_frame_border(Direction::South, BlockPos::ORIGIN);
        // 2 * (5 + 6) - 4 corners - 1 core
        assert_eq!(border.len(), 17);

        let unique: HashSet<_> = border.iter().copied().collect();
        assert_eq!(unique.len(), border.len());
        assert!(!unique.contains(&BlockPos::ORIGIN));
    }

    #[test]
    fn test_border_by_direct_enumeration() {
        let shape = FrameShape::DEFAULT;
        let mut expected = HashSet::new();
        for dy in 0..6 {
            for dx in -2..=2 {
                let on_edge = dy == 0 || dy == 5 || dx == -2 || dx == 2;
                if on_edge && (dx, dy) != (0, 0) {
                    expected.insert(BlockPos::new(dx, dy, 0));
                }
            }
        }

        let got: HashSet<_> = shape
            .border(Direction::East, BlockPos::ORIGIN)
            .into_iter()
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_other_shapes() {
        for (w, h) in [(1, 1), (3, 3), (5, 2), (2, 4)] {
            let shape = FrameShape::new(w, h);
            let border = shape.border(Direction::North, BlockPos::new(10, 70, -4));
            assert_eq!(border.len(), shape.border_len(), "shape {w}x{h}");
        }
    }

    #[test]
    fn test_border_follows_right_vector() {
        let core = BlockPos::new(3, 64, 7);
        let border = collect_frame_border(Direction::South, core);
        assert!(border.iter().all(|pos| pos.x == core.x));
        assert!(border.contains(&BlockPos::new(3, 64, 9)));
        assert!(border.contains(&BlockPos::new(3, 69, 5)));

        let border = collect_frame_border(Direction::East, core);
        assert!(border.iter().all(|pos| pos.z == core.z));
    }

    #[test]
    fn test_interior_is_disjoint_and_complete() {
        let shape = FrameShape::DEFAULT;
        let core = BlockPos::new(0, 0, 0);
        let border: HashSet<_> = shape.border(Direction::South, core).into_iter().collect();
        let interior: HashSet<_> = shape.interior(Direction::South, core).into_iter().collect();

        assert_eq!(interior.len(), 12);
        assert!(border.is_disjoint(&interior));
        assert!(!interior.contains(&core));
        assert_eq!(border.len() + interior.len() + 1, 5 * 6);
        assert!(interior.contains(&(core + FIELD_OFFSET)));
    }

    #[test]
    fn test_order_is_stable() {
        let a = collect_frame_border(Direction::West, BlockPos::new(1, 2, 3));
        let b = collect_frame_border(Direction::West, BlockPos::new(1, 2, 3));
        assert_eq!(a, b);
        assert_eq!(a[0], BlockPos::new(1, 2, 3).offset(Direction::West, -2));
    }
}
