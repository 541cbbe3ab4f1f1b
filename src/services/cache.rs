use std::collections::HashMap;

/// Unbounded string-keyed store. No expiry, no eviction, no locking: the
/// owner decides how it is shared.
#[derive(Debug)]
pub struct Cache<V> {
    entries: HashMap<String, V>,
    generation: u64,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            generation: 0,
        }
    }
}

impl<V> Cache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// Bumped by every `clear`. A value computed outside the owner's lock
    /// should only be stored if the generation is unchanged.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stores `value` unless the cache was cleared since `generation` was
    /// read. Returns whether it was stored.
    pub fn set_if_current(&mut self, generation: u64, key: impl Into<String>, value: V) -> bool {
        if self.generation != generation {
            return false;
        }
        self.set(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let mut cache = Cache::new();
        cache.set("k", 1);
        assert_eq!(cache.get("k"), Some(&1));

        cache.set("k", 2);
        assert_eq!(cache.get("k"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_makes_key_absent() {
        let mut cache = Cache::new();
        cache.set("k", 1);
        cache.remove("k");
        assert_eq!(cache.get("k"), None);

        // no-op on a key that was never there
        cache.remove("missing");
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_every_key() {
        let mut cache = Cache::new();
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            cache.set(*key, i);
        }
        cache.clear();
        for key in ["a", "b", "c"] {
            assert_eq!(cache.get(key), None);
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn stale_values_are_not_stored_after_a_clear() {
        let mut cache = Cache::new();
        let seen = cache.generation();
        cache.clear();
        assert!(!cache.set_if_current(seen, "k", 1));
        assert_eq!(cache.get("k"), None);

        let seen = cache.generation();
        assert!(cache.set_if_current(seen, "k", 2));
        assert_eq!(cache.get("k"), Some(&2));
    }
}
