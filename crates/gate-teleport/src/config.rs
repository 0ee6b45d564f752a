//! Teleport settings.

use gate_geometry::FrameShape;
use serde::{Deserialize, Serialize};

use crate::Tick;

/// Teleport handler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Ticks after arrival before the same entity may teleport again.
    pub cooldown_ticks: Tick,
    /// Re-run frame detection before each teleport and retire gates whose
    /// frame is gone.
    pub revalidate_frame: bool,
    pub shape: FrameShape,
}

impl TeleportConfig {
    /// One second at 20 TPS.
    pub const DEFAULT_COOLDOWN_TICKS: Tick = 20;
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            cooldown_ticks: Self::DEFAULT_COOLDOWN_TICKS,
            revalidate_frame: true,
            shape: FrameShape::DEFAULT,
        }
    }
}
