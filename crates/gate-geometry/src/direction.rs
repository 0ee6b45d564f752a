//! Horizontal compass directions.

use serde::{Deserialize, Serialize};

/// Horizontal compass direction.
///
/// Axes follow the block-game convention: east is `+x`, south is `+z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// All horizontal directions in clockwise order starting at north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The two facings that give distinct frame planes.
    ///
    /// A frame is symmetric about its core column, so south and west describe
    /// the same cells as north and east.
    pub const FRAME_AXES: [Self; 2] = [Self::East, Self::North];

    /// Unit step on the `(x, z)` plane.
    #[must_use]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Rotate 90 degrees clockwise when viewed from above.
    ///
    /// For a frame facing `self`, this is the frame's "right" vector.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Lowercase name, as shown in logs and commands.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}
