//! Gate frame detection.
//!
//! Detection is read-only: it takes `&G` and may run off the simulation thread
//! (for example to preview a half-built frame). Field activation writes, and
//! belongs on the simulation thread.

mod detect;
mod field;

pub use detect::{FacingMismatch, FrameDetector, FrameMatch, Mismatch, NotAFrame, detect};
pub use field::{activate_field, deactivate_field};
