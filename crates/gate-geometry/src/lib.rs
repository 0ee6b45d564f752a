//! Gate Geometry
//!
//! Pure coordinate math for gate frames. Nothing in this crate touches a grid;
//! it only answers "which cells make up a frame anchored here".
//!
//! # Frame layout
//!
//! A frame is a rectangle standing upright on a horizontal axis. Local
//! coordinates are `(dx, dy)` relative to the core cell, where `dx` runs along
//! the facing's right vector and `dy` runs up.
//!
//! ```text
//!  dy
//!   5  # # # # #
//!   4  # . . . #
//!   3  # . . . #
//!   2  # . . . #
//!   1  # . . . #
//!   0  # # C # #
//!     -2-1 0 1 2  dx
//! ```
//!
//! `#` is border, `.` is interior, `C` is the core (never part of the border).

mod direction;
mod pos;
mod shape;

pub use direction::Direction;
pub use pos::BlockPos;
pub use shape::{FIELD_OFFSET, FrameShape, collect_frame_border};
