//! Gate Teleport
//!
//! Reacts to entities entering a gate field and moves them to the gate's
//! destination realm.
//!
//! # Entry event lifecycle
//!
//! ```text
//!  Idle ──► CandidateDetected ──► Resolving ──► Transferring ──► Done
//!    │              │                  │
//!    └──────────────┴──────────────────┴──────────────────────► Rejected
//! ```
//!
//! - `Idle`: debounce check.
//! - `CandidateDetected`: field cell → core → registry entry, optional frame
//!   revalidation.
//! - `Resolving`: attach the destination realm.
//! - `Transferring`: clear fire above the anchor, then move the entity.
//!
//! Nothing here panics or propagates an error to the tick loop. Every event
//! ends in `Done` or `Rejected`.

mod config;
mod cooldown;
mod handler;
mod state;
mod structure;
mod warn_once;

pub use config::TeleportConfig;
pub use cooldown::Cooldowns;
pub use handler::{TeleportContext, TeleportHandler, clear_hazard};
pub use state::{
    Arrival, EntryEvent, Phase, Rejection, TeleportOutcome, TeleportReport, TeleportState,
};
pub use structure::{
    CompletionError, FrameSite, complete_frame, on_frame_block_changed, retire_gate,
};
pub use warn_once::WarnOnce;

/// Simulation tick counter.
pub type Tick = u64;
