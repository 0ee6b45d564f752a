//! Integer block coordinates.

use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::Direction;

/// A cell in the block grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Move `n` cells up (negative moves down).
    #[must_use]
    pub const fn up(self, n: i32) -> Self {
        Self {
            x: self.x,
            y: self.y + n,
            z: self.z,
        }
    }

    /// Move `n` cells along a horizontal direction.
    #[must_use]
    pub const fn offset(self, direction: Direction, n: i32) -> Self {
        let (dx, dz) = direction.step();
        Self {
            x: self.x + dx * n,
            y: self.y,
            z: self.z + dz * n,
        }
    }

    /// Block-centre coordinates, as used for entity placement.
    #[must_use]
    pub fn center(self) -> [f64; 3] {
        [
            f64::from(self.x) + 0.5,
            f64::from(self.y),
            f64::from(self.z) + 0.5,
        ]
    }

    /// The cell containing a continuous world position.
    #[must_use]
    pub fn containing(position: [f64; 3]) -> Self {
        Self {
            x: position[0].floor() as i32,
            y: position[1].floor() as i32,
            z: position[2].floor() as i32,
        }
    }
}

impl Add for BlockPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Debug for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_up() {
        let pos = BlockPos::new(1, 64, -3);
        assert_eq!(pos.up(2), BlockPos::new(1, 66, -3));
        assert_eq!(pos.offset(Direction::East, 3), BlockPos::new(4, 64, -3));
        assert_eq!(pos.offset(Direction::North, 1), BlockPos::new(1, 64, -4));
        assert_eq!(pos.offset(Direction::West, -1), BlockPos::new(2, 64, -3));
    }

    #[test]
    fn test_center_and_containing() {
        let pos = BlockPos::new(-1, 5, 2);
        let center = pos.center();
        assert_eq!(center, [-0.5, 5.0, 2.5]);
        assert_eq!(BlockPos::containing(center), pos);
    }

    #[test]
    fn test_arithmetic() {
        let a = BlockPos::new(1, 2, 3);
        let b = BlockPos::new(0, 1, 0);
        assert_eq!(a - b, BlockPos::new(1, 1, 3));
        assert_eq!(a - b + b, a);
    }
}
