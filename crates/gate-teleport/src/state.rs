//! Teleport state machine types.

use core::fmt;

use gate_geometry::BlockPos;
use gate_registry::{GateId, GateInfo};
use gate_world::RealmId;
use smallvec::SmallVec;

use crate::Tick;

/// An entity's bounding volume intersected a field cell.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryEvent<E> {
    pub entity: E,
    /// Realm the entity is in.
    pub realm: RealmId,
    pub field_cell: BlockPos,
    pub tick: Tick,
}

/// States of one entry event.
///
/// `Done` and `Rejected` are terminal. Every event starts at `Idle`.
#[derive(Clone, Debug)]
pub enum TeleportState<E> {
    Idle(EntryEvent<E>),
    CandidateDetected {
        event: EntryEvent<E>,
        core: BlockPos,
    },
    Resolving {
        event: EntryEvent<E>,
        gate: GateInfo,
    },
    Transferring {
        event: EntryEvent<E>,
        gate: GateInfo,
    },
    Done(Arrival<E>),
    Rejected(Rejection),
}

impl<E> TeleportState<E> {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Idle(_) => Phase::Idle,
            Self::CandidateDetected { .. } => Phase::CandidateDetected,
            Self::Resolving { .. } => Phase::Resolving,
            Self::Transferring { .. } => Phase::Transferring,
            Self::Done(_) => Phase::Done,
            Self::Rejected(_) => Phase::Rejected,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Rejected(_))
    }
}

/// Data-free mirror of [`TeleportState`], for tracing a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    CandidateDetected,
    Resolving,
    Transferring,
    Done,
    Rejected,
}

/// A completed transfer.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrival<E> {
    pub entity: E,
    pub gate: GateId,
    pub realm: RealmId,
    pub position: [f64; 3],
    /// A combustion block above the anchor was replaced with air.
    pub cleared_hazard: bool,
}

/// Why an entry event did not teleport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The entity arrived recently and is still debounced.
    Cooldown { eligible_at: Tick },
    /// No registered gate owns this field cell.
    NoGate,
    /// Revalidation found the frame destroyed; the gate was unregistered.
    FrameBroken { gate: GateId },
    /// The destination realm could not be attached.
    RealmUnavailable(RealmId),
    /// The entity despawned before the transfer.
    EntityGone,
    /// Internal state was inconsistent; only this transfer was aborted.
    Internal(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cooldown { eligible_at } => write!(f, "cooling down until tick {eligible_at}"),
            Self::NoGate => f.write_str("no gate"),
            Self::FrameBroken { gate } => write!(f, "frame of gate {gate} is broken"),
            Self::RealmUnavailable(realm) => write!(f, "realm {realm} unavailable"),
            Self::EntityGone => f.write_str("entity gone"),
            Self::Internal(reason) => write!(f, "internal error: {reason}"),
        }
    }
}

/// Terminal result of one entry event.
#[derive(Clone, Debug, PartialEq)]
pub enum TeleportOutcome<E> {
    Done(Arrival<E>),
    Rejected(Rejection),
}

impl<E> TeleportOutcome<E> {
    #[must_use]
    pub const fn arrival(&self) -> Option<&Arrival<E>> {
        match self {
            Self::Done(arrival) => Some(arrival),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Done(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Outcome plus the phases the event passed through.
#[derive(Clone, Debug, PartialEq)]
pub struct TeleportReport<E> {
    pub outcome: TeleportOutcome<E>,
    pub phases: SmallVec<[Phase; 5]>,
}
