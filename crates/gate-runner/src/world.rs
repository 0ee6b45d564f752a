//! The hosted world and everything the gate subsystem needs per world.

use eyre::eyre;
use gate_frame::activate_field;
use gate_geometry::{BlockPos, Direction, FIELD_OFFSET, FrameShape};
use gate_registry::{GateInfo, GateRegistry, GateStore};
use gate_teleport::{
    EntryEvent, FrameSite, TeleportContext, TeleportHandler, TeleportOutcome, Tick,
    complete_frame, retire_gate,
};
use gate_weather::WeatherSelection;
use gate_world::memory::{Block, Entity, EntityTable, MemoryGrid, MemoryRealms};
use gate_world::{Grid, RealmId, RealmProvider};
use tracing::{debug, info, warn};

use crate::commands::{Command, HELP};
use crate::config::RunnerConfig;

/// Core of the gate built into a fresh world.
pub const SPAWN_GATE_CORE: BlockPos = BlockPos::new(0, 64, 0);

/// Gate state for one loaded world.
///
/// Created on world load and dropped on unload; nothing here is global.
pub struct GateWorld<S> {
    registry: GateRegistry<S>,
    realms: MemoryRealms,
    entities: EntityTable,
    handler: TeleportHandler<Entity, Block>,
    pocket: RealmId,
    weather: WeatherSelection,
    tick: Tick,
}

impl<S: GateStore> GateWorld<S> {
    /// Load the registry from `store` and rebuild the overworld around it.
    pub fn load(store: S, config: &RunnerConfig) -> eyre::Result<Self> {
        let registry = GateRegistry::load(store)?;
        let realms =
            MemoryRealms::with_configured([RealmId::overworld(), config.pocket_realm.clone()]);

        let mut world = Self {
            registry,
            realms,
            entities: EntityTable::new(),
            handler: TeleportHandler::new(config.teleport, Block::GateFrame, Block::GateField),
            pocket: config.pocket_realm.clone(),
            weather: WeatherSelection::Clear,
            tick: 0,
        };

        world.place_stored_frames()?;
        if world.registry.is_empty() {
            world.build_spawn_gate()?;
        }

        info!("Loaded world with {} gate(s)", world.registry.len());
        Ok(world)
    }

    /// Drop the world, handing back the store.
    pub fn unload(self) -> S {
        info!("Unloading world at tick {}", self.tick);
        self.registry.unload()
    }

    pub const fn registry(&self) -> &GateRegistry<S> {
        &self.registry
    }

    pub const fn entities(&self) -> &EntityTable {
        &self.entities
    }

    pub const fn weather(&self) -> WeatherSelection {
        self.weather
    }

    pub const fn current_tick(&self) -> Tick {
        self.tick
    }

    fn overworld(&mut self) -> eyre::Result<&mut MemoryGrid> {
        self.realms
            .get_realm(&RealmId::overworld())
            .ok_or_else(|| eyre!("overworld is not configured"))
    }

    /// The block grid is not saved, so stored gates get their frames back on
    /// load.
    fn place_stored_frames(&mut self) -> eyre::Result<()> {
        let shape = self.handler.config().shape;
        let detector = self.handler.detector().clone();
        let gates = self.registry.gates();
        let grid = self.overworld()?;

        for gate in gates {
            if gate.home_realm != RealmId::overworld() {
                warn!(
                    "Gate {} stands in {}, which this world does not build",
                    gate.id, gate.home_realm
                );
                continue;
            }
            place_frame(grid, shape, gate.core_position);
            match detector.detect(&*grid, gate.core_position) {
                Ok(frame) => {
                    activate_field(grid, &frame, &Block::GateField);
                }
                Err(e) => warn!("Stored gate {} has no frame: {e}", gate.id),
            }
        }
        Ok(())
    }

    fn build_spawn_gate(&mut self) -> eyre::Result<GateInfo> {
        let shape = self.handler.config().shape;
        let detector = self.handler.detector().clone();
        let destination = self.pocket.clone();
        let registry = &self.registry;
        let grid = self
            .realms
            .get_realm(&RealmId::overworld())
            .ok_or_else(|| eyre!("overworld is not configured"))?;

        place_frame(grid, shape, SPAWN_GATE_CORE);
        let gate = complete_frame(
            registry,
            grid,
            &detector,
            &Block::GateField,
            FrameSite::new(RealmId::overworld(), SPAWN_GATE_CORE),
            destination,
            "Spawn Gate",
        )?;
        info!("Built {} at {}", gate.name, gate.core_position);
        Ok(gate)
    }

    /// Advance one tick: expire cooldowns, then feed every entity standing in
    /// a gate field to the teleport handler.
    ///
    /// Returns the number of entities that arrived somewhere.
    pub fn tick(&mut self) -> usize {
        self.tick += 1;
        let now = self.tick;
        self.handler.tick(now);

        let events = self.entry_events(now);
        let mut ctx = TeleportContext {
            registry: &self.registry,
            realms: &mut self.realms,
            entities: &mut self.entities,
        };

        let mut arrivals = 0;
        for event in events {
            let report = self.handler.on_entity_enter(event, &mut ctx);
            match report.outcome {
                TeleportOutcome::Done(_) => arrivals += 1,
                TeleportOutcome::Rejected(reason) => {
                    debug!("Entry rejected after {:?}: {reason}", report.phases.as_slice());
                }
            }
        }
        arrivals
    }

    fn entry_events(&self, now: Tick) -> Vec<EntryEvent<Entity>> {
        self.entities
            .iter()
            .filter_map(|(entity, state)| {
                let cell = BlockPos::containing(state.position);
                let grid = self.realms.grid(&state.realm)?;
                (grid.material_at(cell) == Block::GateField).then(|| EntryEvent {
                    entity,
                    realm: state.realm.clone(),
                    field_cell: cell,
                    tick: now,
                })
            })
            .collect()
    }

    /// Spawn an entity standing in the field of the lowest-sorted gate.
    pub fn spawn_at_first_gate(&mut self) -> Option<Entity> {
        let gate = self.registry.gates().into_iter().next()?;
        let field_cell = gate.core_position + FIELD_OFFSET;
        let entity = self
            .entities
            .spawn(RealmId::overworld(), field_cell.center());
        info!("Spawned {entity} in the field of {}", gate.name);
        Some(entity)
    }

    /// Apply a console command. Returns `false` when the runner should stop.
    pub fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::List => {
                let gates = self.registry.gates();
                info!("Gates ({}):", gates.len());
                for gate in gates {
                    info!(
                        "  - {} '{}' at {} -> {}",
                        gate.id, gate.name, gate.core_position, gate.destination_realm
                    );
                }
            }
            Command::Rename { id, name } => match self.registry.rename(id, name) {
                Ok(()) => info!("Renamed gate {id}"),
                Err(e) => warn!("Rename failed: {e}"),
            },
            Command::Unregister(core) => {
                let Some(gate) = self.registry.lookup_by_core(core) else {
                    info!("No gate at {core}");
                    return true;
                };
                let shape = self.handler.config().shape;
                let registry = &self.registry;
                match self.realms.get_realm(&gate.home_realm) {
                    Some(grid) => {
                        retire_gate(registry, grid, shape, &Block::GateField, core);
                    }
                    None => warn!(
                        "Gate {} stands in unavailable realm {}",
                        gate.id, gate.home_realm
                    ),
                }
            }
            Command::Weather(weather) => {
                self.weather = weather;
                info!(
                    "Weather set to {weather} (button {})",
                    weather.button_id()
                );
            }
            Command::Spawn => {
                if self.spawn_at_first_gate().is_none() {
                    info!("No gates to spawn at");
                }
            }
            Command::Quit => {
                info!("Shutting down...");
                return false;
            }
            Command::Help => {
                info!("\r\nCommands:");
                for line in HELP {
                    info!("{line}");
                }
            }
            Command::Usage(usage) => info!("Usage: {usage}"),
            Command::Unknown(s) => {
                if !s.is_empty() {
                    info!("Unknown command: '{}'. Type 'help' for commands.", s);
                }
            }
        }
        true
    }
}

/// Lay frame blocks and a core block for a gate facing east.
fn place_frame(grid: &mut MemoryGrid, shape: FrameShape, core: BlockPos) {
    for cell in shape.border(Direction::East.clockwise(), core) {
        grid.set_material(cell, Block::GateFrame);
    }
    grid.set_material(core, Block::GateCore);
}

#[cfg(test)]
mod tests {
    use gate_registry::MemoryStore;
    use gate_world::memory::EntityState;
    use pretty_assertions::assert_eq;

    use super::*;

    fn world() -> GateWorld<MemoryStore> {
        GateWorld::load(MemoryStore::new(), &RunnerConfig::default()).unwrap()
    }

    #[test]
    fn test_fresh_world_has_spawn_gate() {
        let world = world();
        let gates = world.registry().gates();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].core_position, SPAWN_GATE_CORE);
        assert_eq!(gates[0].destination_realm, RealmId::new("gate:pocket"));

        let overworld = world.realms.grid(&RealmId::overworld()).unwrap();
        assert_eq!(
            overworld.material_at(SPAWN_GATE_CORE + FIELD_OFFSET),
            Block::GateField
        );
    }

    #[test]
    fn test_spawned_entity_is_teleported_once() {
        let mut world = world();
        let entity = world.spawn_at_first_gate().unwrap();

        assert_eq!(world.tick(), 1);
        assert_eq!(
            world.entities().get(entity),
            Some(&EntityState {
                realm: RealmId::new("gate:pocket"),
                position: (SPAWN_GATE_CORE + FIELD_OFFSET).center(),
                velocity: [0.0; 3],
            })
        );

        // The pocket side has no field, so nothing more happens.
        assert_eq!(world.tick(), 0);
        assert_eq!(world.registry().len(), 1);
    }

    #[test]
    fn test_reload_rebuilds_stored_frames() {
        let world = world();
        let gate = world.registry().gates().remove(0);
        let store = world.unload();

        let world = GateWorld::load(store, &RunnerConfig::default()).unwrap();
        assert_eq!(world.registry().gates(), vec![gate.clone()]);
        let overworld = world.realms.grid(&RealmId::overworld()).unwrap();
        assert_eq!(
            overworld.material_at(gate.core_position + FIELD_OFFSET),
            Block::GateField
        );
    }

    #[test]
    fn test_commands() {
        let mut world = world();
        let gate = world.registry().gates().remove(0);

        assert!(world.execute(Command::Rename {
            id: gate.id,
            name: "Renamed".into()
        }));
        assert_eq!(world.registry().lookup_by_id(gate.id).unwrap().name, "Renamed");

        assert!(world.execute(Command::Weather(WeatherSelection::Thunder)));
        assert_eq!(world.weather(), WeatherSelection::Thunder);

        assert!(world.execute(Command::Unregister(gate.core_position)));
        assert!(world.registry().is_empty());
        let overworld = world.realms.grid(&RealmId::overworld()).unwrap();
        assert_eq!(
            overworld.material_at(gate.core_position + FIELD_OFFSET),
            Block::Air
        );
        assert!(world.spawn_at_first_gate().is_none());

        assert!(!world.execute(Command::Quit));
    }
}
