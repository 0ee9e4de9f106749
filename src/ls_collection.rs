//! Insertion-ordered keyed collections and grouping helpers
//!
//! Every keyed store in the stats engine preserves insertion order, which
//! the trailing-window and grouping slices depend on.

use std::hash::Hash;

use indexmap::map::Entry;
use indexmap::IndexMap;

/// Keyed collection with get-or-create semantics and stable iteration order
#[derive(Debug, Clone)]
pub struct StatsCollection<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> serde::Serialize for StatsCollection<K, V>
where
    K: serde::Serialize + Hash + Eq,
    V: serde::Serialize,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<K, V> StatsCollection<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry. A colliding key silently overwrites the value while
    /// keeping the original insertion position.
    pub fn insert(&mut self, key: K, value: V) -> &mut V {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(value);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(value),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Return the entry under `key`, constructing and inserting it via
    /// `factory` when absent. Exactly one entry is ever created per key:
    /// the factory does not run for keys already present.
    pub fn get_or_make(&mut self, key: K, factory: impl FnOnce() -> V) -> &mut V {
        self.entries.entry(key).or_insert_with(factory)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}

impl<K, V> Default for StatsCollection<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Partition `items` into groups keyed by `key`, preserving both group
/// discovery order and per-group item order
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> IndexMap<K, Vec<T>>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// The trailing `n` elements of `items` in original order, or all of them
/// when fewer are present
pub fn trailing<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut collection = StatsCollection::new();
        collection.insert(7u64, "seven");
        collection.insert(3, "three");
        assert_eq!(collection.get(&7), Some(&"seven"));
        assert_eq!(collection.get(&5), None);
        assert_eq!(collection.count(), 2);
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut collection = StatsCollection::new();
        for key in [9u64, 2, 5, 1] {
            collection.insert(key, key * 10);
        }
        let keys: Vec<u64> = collection.keys().copied().collect();
        assert_eq!(keys, vec![9, 2, 5, 1]);
    }

    #[test]
    fn test_insert_collision_last_write_wins() {
        let mut collection = StatsCollection::new();
        collection.insert("a", 1);
        collection.insert("b", 2);
        collection.insert("a", 3);
        assert_eq!(collection.get(&"a"), Some(&3));
        // position of the original insert is kept
        let keys: Vec<&str> = collection.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(collection.count(), 2);
    }

    #[test]
    fn test_get_or_make_creates_once() {
        let mut collection: StatsCollection<&str, Vec<u32>> = StatsCollection::new();
        collection.get_or_make("k", Vec::new).push(1);
        collection.get_or_make("k", Vec::new).push(2);
        assert_eq!(collection.get(&"k"), Some(&vec![1, 2]));
        assert_eq!(collection.count(), 1);
    }

    #[test]
    fn test_get_or_make_factory_not_run_for_existing() {
        let mut collection = StatsCollection::new();
        collection.insert("k", 1);
        let value = collection.get_or_make("k", || panic!("factory must not run"));
        assert_eq!(*value, 1);
    }

    #[test]
    fn test_group_by_preserves_orders() {
        let items = vec![("a", 1), ("b", 2), ("a", 3), ("c", 4), ("b", 5)];
        let groups = group_by(items.iter(), |(name, _)| *name);
        let group_keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(group_keys, vec!["a", "b", "c"]);
        let a_values: Vec<i32> = groups[&"a"].iter().map(|(_, v)| *v).collect();
        assert_eq!(a_values, vec![1, 3]);
    }

    #[test]
    fn test_trailing_window() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(trailing(&items, 3), &[7, 8, 9]);
        assert_eq!(trailing(&items, 10), &items[..]);
        assert_eq!(trailing(&items, 50), &items[..]);
        let empty: Vec<u32> = Vec::new();
        assert_eq!(trailing(&empty, 5), &[] as &[u32]);
    }
}
