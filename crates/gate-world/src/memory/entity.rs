//! Entity handles and the entity table.
//!
//! Handles carry the generation of the slot they were issued for. Despawning
//! bumps the slot's generation, so a handle kept by a cooldown table goes
//! stale instead of aliasing whatever spawns into the slot next.

use core::fmt;

use tracing::trace;

use crate::{EntityMover, RealmId};

/// Handle to an entity in an [`EntityTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    slot: u32,
    generation: u32,
}

impl Entity {
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity(#{}.{})", self.slot, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.slot, self.generation)
    }
}

/// Where an entity is and how it is moving.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub realm: RealmId,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    state: Option<EntityState>,
}

/// All live entities of the in-memory host, across realms.
#[derive(Debug, Default)]
pub struct EntityTable {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
    live: usize,
}

impl EntityTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, realm: RealmId, position: [f64; 3]) -> Entity {
        let state = EntityState {
            realm,
            position,
            velocity: [0.0; 3],
        };

        let slot = match self.vacant.pop() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let entry = &mut self.slots[slot as usize];
        entry.state = Some(state);
        self.live += 1;

        Entity {
            slot,
            generation: entry.generation,
        }
    }

    /// Remove a live entity and return its last state.
    pub fn despawn(&mut self, entity: Entity) -> Option<EntityState> {
        let entry = self.slot_mut(entity)?;
        let state = entry.state.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.vacant.push(entity.slot);
        self.live -= 1;
        Some(state)
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&EntityState> {
        self.slots
            .get(entity.slot as usize)
            .filter(|entry| entry.generation == entity.generation)
            .and_then(|entry| entry.state.as_ref())
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut EntityState> {
        self.slot_mut(entity)?.state.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &EntityState)> {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            let state = entry.state.as_ref()?;
            let entity = Entity {
                slot: slot as u32,
                generation: entry.generation,
            };
            Some((entity, state))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot_mut(&mut self, entity: Entity) -> Option<&mut Slot> {
        self.slots
            .get_mut(entity.slot as usize)
            .filter(|entry| entry.generation == entity.generation)
    }
}

impl EntityMover for EntityTable {
    type Entity = Entity;

    fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    fn move_entity(&mut self, entity: Entity, realm: &RealmId, position: [f64; 3]) {
        let Some(state) = self.get_mut(entity) else {
            return;
        };
        trace!("Moving {entity} from {} to {realm} at {position:?}", state.realm);
        *state = EntityState {
            realm: realm.clone(),
            position,
            velocity: [0.0; 3],
        };
    }
}
