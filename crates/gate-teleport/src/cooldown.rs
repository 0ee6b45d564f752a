//! Per-entity teleport debounce.

use core::hash::Hash;

use hashbrown::HashMap;

use crate::Tick;

/// Ticks at which entities become eligible to teleport again.
#[derive(Debug)]
pub struct Cooldowns<E> {
    eligible_at: HashMap<E, Tick>,
}

impl<E> Default for Cooldowns<E> {
    fn default() -> Self {
        Self {
            eligible_at: HashMap::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> Cooldowns<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a window of `length` ticks starting at `now`.
    pub fn start(&mut self, entity: E, now: Tick, length: Tick) {
        self.eligible_at.insert(entity, now.saturating_add(length));
    }

    /// The tick the entity becomes eligible, if it is still cooling down.
    #[must_use]
    pub fn remaining(&self, entity: E, now: Tick) -> Option<Tick> {
        self.eligible_at
            .get(&entity)
            .copied()
            .filter(|&eligible| now < eligible)
    }

    /// Drop every expired window.
    pub fn prune(&mut self, now: Tick) {
        self.eligible_at.retain(|_, eligible| now < *eligible);
    }

    /// Drop an entity's window, e.g. when it despawns.
    pub fn forget(&mut self, entity: E) -> bool {
        self.eligible_at.remove(&entity).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.eligible_at.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.eligible_at.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(1u32, 100, 20);

        assert_eq!(cooldowns.remaining(1, 100), Some(120));
        assert_eq!(cooldowns.remaining(1, 119), Some(120));
        assert_eq!(cooldowns.remaining(1, 120), None);
        assert_eq!(cooldowns.remaining(2, 100), None);
    }

    #[test]
    fn test_prune_and_forget() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(1u32, 0, 10);
        cooldowns.start(2u32, 5, 10);

        cooldowns.prune(10);
        assert_eq!(cooldowns.len(), 1);
        assert!(cooldowns.forget(2));
        assert!(!cooldowns.forget(2));
        assert!(cooldowns.is_empty());
    }

    #[test]
    fn test_zero_length_window_never_blocks() {
        let mut cooldowns = Cooldowns::new();
        cooldowns.start(1u32, 50, 0);
        assert_eq!(cooldowns.remaining(1, 50), None);
    }
}
