//! The teleport state machine.

use core::fmt::Debug;
use core::hash::Hash;

use gate_frame::FrameDetector;
use gate_geometry::{BlockPos, FIELD_OFFSET};
use gate_registry::{GateInfo, GateRegistry, GateStore};
use gate_world::{BlockMaterial, EntityMover, Grid, RealmId, RealmProvider};
use smallvec::SmallVec;
use tracing::{debug, error, info, trace, warn};

use crate::structure::retire_gate;
use crate::{
    Arrival, Cooldowns, EntryEvent, Rejection, TeleportConfig, TeleportOutcome, TeleportReport,
    TeleportState, Tick, WarnOnce,
};

/// Host collaborators for one world, borrowed for the duration of an event.
pub struct TeleportContext<'a, S, R, H> {
    pub registry: &'a GateRegistry<S>,
    pub realms: &'a mut R,
    pub entities: &'a mut H,
}

/// Turns entry events into transfers.
///
/// Owned by the simulation thread. Holds the debounce table and the
/// warn-once state; everything else is borrowed per event.
#[derive(Debug)]
pub struct TeleportHandler<E, M> {
    config: TeleportConfig,
    detector: FrameDetector<M>,
    field: M,
    cooldowns: Cooldowns<E>,
    realm_warnings: WarnOnce<RealmId>,
}

impl<E, M> TeleportHandler<E, M>
where
    E: Copy + Eq + Hash + Debug,
    M: BlockMaterial,
{
    #[must_use]
    pub fn new(config: TeleportConfig, frame_material: M, field: M) -> Self {
        Self {
            config,
            detector: FrameDetector::new(frame_material).with_shape(config.shape),
            field,
            cooldowns: Cooldowns::new(),
            realm_warnings: WarnOnce::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TeleportConfig {
        &self.config
    }

    #[must_use]
    pub const fn detector(&self) -> &FrameDetector<M> {
        &self.detector
    }

    #[must_use]
    pub const fn field(&self) -> &M {
        &self.field
    }

    #[must_use]
    pub const fn cooldowns(&self) -> &Cooldowns<E> {
        &self.cooldowns
    }

    /// Per-tick housekeeping: drop expired debounce windows.
    pub fn tick(&mut self, now: Tick) {
        self.cooldowns.prune(now);
    }

    /// The entity despawned or left the world.
    pub fn on_entity_removed(&mut self, entity: E) {
        if self.cooldowns.forget(entity) {
            trace!("Dropped cooldown of {entity:?}");
        }
    }

    /// Run one entry event to a terminal state.
    pub fn on_entity_enter<S, R, H>(
        &mut self,
        event: EntryEvent<E>,
        ctx: &mut TeleportContext<'_, S, R, H>,
    ) -> TeleportReport<E>
    where
        S: GateStore,
        R: RealmProvider,
        R::Grid: Grid<Material = M>,
        H: EntityMover<Entity = E>,
    {
        let mut phases = SmallVec::new();
        let mut state = TeleportState::Idle(event);

        let outcome = loop {
            phases.push(state.phase());
            state = match state {
                TeleportState::Done(arrival) => break TeleportOutcome::Done(arrival),
                TeleportState::Rejected(rejection) => break TeleportOutcome::Rejected(rejection),
                active => self.step(active, ctx),
            };
        };

        TeleportReport { outcome, phases }
    }

    /// Advance a non-terminal state by one transition.
    pub fn step<S, R, H>(
        &mut self,
        state: TeleportState<E>,
        ctx: &mut TeleportContext<'_, S, R, H>,
    ) -> TeleportState<E>
    where
        S: GateStore,
        R: RealmProvider,
        R::Grid: Grid<Material = M>,
        H: EntityMover<Entity = E>,
    {
        match state {
            TeleportState::Idle(event) => self.check_cooldown(event),
            TeleportState::CandidateDetected { event, core } => self.find_gate(event, core, ctx),
            TeleportState::Resolving { event, gate } => self.resolve_realm(event, gate, ctx),
            TeleportState::Transferring { event, gate } => self.transfer(event, gate, ctx),
            terminal @ (TeleportState::Done(_) | TeleportState::Rejected(_)) => terminal,
        }
    }

    fn check_cooldown(&self, event: EntryEvent<E>) -> TeleportState<E> {
        if let Some(eligible_at) = self.cooldowns.remaining(event.entity, event.tick) {
            trace!("{:?} is cooling down until tick {eligible_at}", event.entity);
            return TeleportState::Rejected(Rejection::Cooldown { eligible_at });
        }

        let core = event.field_cell - FIELD_OFFSET;
        TeleportState::CandidateDetected { event, core }
    }

    fn find_gate<S, R, H>(
        &self,
        event: EntryEvent<E>,
        core: BlockPos,
        ctx: &mut TeleportContext<'_, S, R, H>,
    ) -> TeleportState<E>
    where
        S: GateStore,
        R: RealmProvider,
        R::Grid: Grid<Material = M>,
    {
        let gate = match ctx.registry.checked_lookup_by_core(core) {
            Ok(Some(gate)) => gate,
            Ok(None) => {
                trace!("No gate owns field cell {:?}", event.field_cell);
                return TeleportState::Rejected(Rejection::NoGate);
            }
            Err(e) => {
                error!("Aborting teleport of {:?}: {e}", event.entity);
                return TeleportState::Rejected(Rejection::Internal(e.to_string()));
            }
        };

        if gate.home_realm != event.realm {
            trace!(
                "Field cell {:?} in {} is not gate {}, which stands in {}",
                event.field_cell, event.realm, gate.id, gate.home_realm
            );
            return TeleportState::Rejected(Rejection::NoGate);
        }

        if self.config.revalidate_frame {
            if let Some(grid) = ctx.realms.get_realm(&gate.home_realm) {
                if self.detector.detect(&*grid, core).is_err() {
                    info!("Frame of gate {} '{}' is gone", gate.id, gate.name);
                    retire_gate(ctx.registry, grid, self.detector.shape, &self.field, core);
                    return TeleportState::Rejected(Rejection::FrameBroken { gate: gate.id });
                }
            } else {
                debug!("Home realm {} not attached; skipping frame check", gate.home_realm);
            }
        }

        TeleportState::Resolving { event, gate }
    }

    fn resolve_realm<S, R, H>(
        &mut self,
        event: EntryEvent<E>,
        gate: GateInfo,
        ctx: &mut TeleportContext<'_, S, R, H>,
    ) -> TeleportState<E>
    where
        R: RealmProvider,
        H: EntityMover<Entity = E>,
    {
        if !ctx.entities.contains(event.entity) {
            debug!("{:?} despawned before teleporting", event.entity);
            return TeleportState::Rejected(Rejection::EntityGone);
        }

        let realm = &gate.destination_realm;
        if ctx.realms.get_realm(realm).is_none() {
            if self.realm_warnings.should_warn(realm) {
                warn!(
                    "Gate {} '{}' leads to realm {realm}, which is not available",
                    gate.id, gate.name
                );
            }
            return TeleportState::Rejected(Rejection::RealmUnavailable(realm.clone()));
        }
        self.realm_warnings.clear(realm);

        TeleportState::Transferring { event, gate }
    }

    fn transfer<S, R, H>(
        &mut self,
        event: EntryEvent<E>,
        gate: GateInfo,
        ctx: &mut TeleportContext<'_, S, R, H>,
    ) -> TeleportState<E>
    where
        R: RealmProvider,
        R::Grid: Grid<Material = M>,
        H: EntityMover<Entity = E>,
    {
        let Some(grid) = ctx.realms.get_realm(&gate.destination_realm) else {
            error!(
                "Realm {} detached between resolve and transfer",
                gate.destination_realm
            );
            return TeleportState::Rejected(Rejection::Internal(format!(
                "realm {} detached mid-transfer",
                gate.destination_realm
            )));
        };

        // From here on nothing can fail: once the hazard is cleared the
        // entity is always moved.
        let arrival_cell = gate.destination_anchor().up(1);
        let cleared_hazard = clear_hazard(grid, arrival_cell);
        let position = arrival_cell.center();
        ctx.entities
            .move_entity(event.entity, &gate.destination_realm, position);
        self.cooldowns
            .start(event.entity, event.tick, self.config.cooldown_ticks);

        info!(
            "Teleported {:?} through gate '{}' to {} at {arrival_cell:?}",
            event.entity, gate.name, gate.destination_realm
        );

        TeleportState::Done(Arrival {
            entity: event.entity,
            gate: gate.id,
            realm: gate.destination_realm,
            position,
            cleared_hazard,
        })
    }
}

/// Replace a combustion block at `cell` with air. Returns whether it did.
pub fn clear_hazard<G: Grid>(grid: &mut G, cell: BlockPos) -> bool {
    let material = grid.material_at(cell);
    if !material.is_combustion() {
        return false;
    }
    debug!("Clearing {material:?} at {cell:?}");
    grid.set_material(cell, <G::Material as BlockMaterial>::air());
    true
}
