//! Rate limiting for repeated warnings.

use core::hash::Hash;

use hashbrown::HashSet;

/// Remembers which keys have already been warned about.
///
/// A key warns once until [`WarnOnce::clear`] re-arms it, so a problem that
/// goes away and comes back is reported again.
#[derive(Debug)]
pub struct WarnOnce<K> {
    warned: HashSet<K>,
}

impl<K> Default for WarnOnce<K> {
    fn default() -> Self {
        Self {
            warned: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> WarnOnce<K> {
    /// Returns `true` the first time a key is seen.
    pub fn should_warn(&mut self, key: &K) -> bool {
        if self.warned.contains(key) {
            return false;
        }
        self.warned.insert(key.clone());
        true
    }

    pub fn clear(&mut self, key: &K) {
        self.warned.remove(key);
    }

    #[must_use]
    pub fn is_armed(&self, key: &K) -> bool {
        !self.warned.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warns_once_until_cleared() {
        let mut warn = WarnOnce::default();
        assert!(warn.should_warn(&"pocket"));
        assert!(!warn.should_warn(&"pocket"));
        assert!(warn.should_warn(&"other"));

        warn.clear(&"pocket");
        assert!(warn.is_armed(&"pocket"));
        assert!(warn.should_warn(&"pocket"));
    }
}
