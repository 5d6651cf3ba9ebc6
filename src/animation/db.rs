use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::entity::StateType;

/// Two-level animation table: state first, then direction key.
///
/// A mode either holds a keyed family (one entry per key) or a single
/// entry used whatever the key is.
#[derive(Debug, Clone)]
pub struct AnimationDb<K, D> {
    entries: HashMap<(StateType, Option<K>), D>,
}

impl<K, D> AnimationDb<K, D>
where
    K: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, mode: StateType, key: K, data: D) -> bool {
        self.insert_entry(mode, Some(key), data)
    }

    pub fn insert_single(&mut self, mode: StateType, data: D) -> bool {
        self.insert_entry(mode, None, data)
    }

    fn insert_entry(&mut self, mode: StateType, key: Option<K>, data: D) -> bool {
        if self.entries.contains_key(&(mode, key)) {
            log::error!("Animation for {:?}/{:?} already registered", mode, key);
            return false;
        }
        self.entries.insert((mode, key), data);
        true
    }

    /// Exact `(mode, key)` entry, falling back to the mode's single entry
    pub fn get(&self, mode: StateType, key: K) -> Option<&D> {
        self.entries
            .get(&(mode, Some(key)))
            .or_else(|| self.entries.get(&(mode, None)))
    }

    pub fn single(&self, mode: StateType) -> Option<&D> {
        self.entries.get(&(mode, None))
    }

    /// All keyed entries of one mode
    pub fn family(&self, mode: StateType) -> Vec<(K, &D)> {
        self.entries
            .iter()
            .filter_map(|((m, key), data)| match key {
                Some(key) if *m == mode => Some((*key, data)),
                _ => None,
            })
            .collect()
    }

    pub fn has_mode(&self, mode: StateType) -> bool {
        self.entries.keys().any(|(m, _)| *m == mode)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, D> Default for AnimationDb<K, D>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
