use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::entity::property::{Property, PropertyStore};

/// Picks the key of the animation to activate, reading the entity's
/// properties at the moment of selection
pub type KeyFn<K> = Box<dyn Fn(&PropertyStore) -> Option<K>>;

/// Result of a selection: the lone animation, or the one stored under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<K> {
    Single,
    Key(K),
}

enum Family<K, A> {
    Single(A),
    Keyed {
        animations: HashMap<K, A>,
        key_fn: KeyFn<K>,
    },
}

/// A family of interchangeable animations plus the rule that picks one
pub struct AnimationSelector<K, A> {
    family: Family<K, A>,
}

impl<K, A> AnimationSelector<K, A>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Selector that always yields `animation`
    pub fn single(animation: A) -> Self {
        Self {
            family: Family::Single(animation),
        }
    }

    /// Selector that looks animations up by the key `key_fn` returns
    pub fn keyed(key_fn: KeyFn<K>) -> Self {
        Self {
            family: Family::Keyed {
                animations: HashMap::new(),
                key_fn,
            },
        }
    }

    /// Selector keyed on the current value of a named property
    pub fn by_property(name: &str) -> Self
    where
        K: Property + 'static,
    {
        let name = name.to_string();
        Self::keyed(Box::new(move |properties: &PropertyStore| properties.get::<K>(&name)))
    }

    /// Add an animation under `key`. A key can only be registered once;
    /// returns false (and keeps the first animation) on a duplicate.
    pub fn register(&mut self, key: K, animation: A) -> bool {
        match &mut self.family {
            Family::Single(_) => {
                log::error!("Cannot register {:?} in a single-animation selector", key);
                false
            }
            Family::Keyed { animations, .. } => {
                if animations.contains_key(&key) {
                    log::error!("{:?} is already registered", key);
                    return false;
                }
                animations.insert(key, animation);
                true
            }
        }
    }

    /// Resolve the selection against the current property values
    pub fn select(&self, properties: &PropertyStore) -> Option<Selection<K>> {
        match &self.family {
            Family::Single(_) => Some(Selection::Single),
            Family::Keyed { animations, key_fn } => {
                let key = key_fn(properties)?;
                animations.contains_key(&key).then_some(Selection::Key(key))
            }
        }
    }

    pub fn get(&self, selection: Selection<K>) -> Option<&A> {
        match (&self.family, selection) {
            (Family::Single(animation), Selection::Single) => Some(animation),
            (Family::Keyed { animations, .. }, Selection::Key(key)) => animations.get(&key),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, selection: Selection<K>) -> Option<&mut A> {
        match (&mut self.family, selection) {
            (Family::Single(animation), Selection::Single) => Some(animation),
            (Family::Keyed { animations, .. }, Selection::Key(key)) => animations.get_mut(&key),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.family {
            Family::Single(_) => 1,
            Family::Keyed { animations, .. } => animations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::FaceDirection;

    fn store(dir: FaceDirection) -> PropertyStore {
        let mut properties = PropertyStore::new();
        properties.register("FaceDirection", dir);
        properties
    }

    #[test]
    fn test_single_always_selects() {
        let selector: AnimationSelector<FaceDirection, &str> = AnimationSelector::single("coin");
        let selection = selector.select(&PropertyStore::new());
        assert_eq!(selection, Some(Selection::Single));
        assert_eq!(selector.get(Selection::Single), Some(&"coin"));
    }

    #[test]
    fn test_by_property_reads_current_value() {
        let mut selector = AnimationSelector::by_property("FaceDirection");
        selector.register(FaceDirection::Left, "left");
        selector.register(FaceDirection::Right, "right");

        let mut properties = store(FaceDirection::Right);
        let selection = selector.select(&properties).unwrap();
        assert_eq!(selector.get(selection), Some(&"right"));

        properties.set("FaceDirection", FaceDirection::Left);
        let selection = selector.select(&properties).unwrap();
        assert_eq!(selector.get(selection), Some(&"left"));
    }

    #[test]
    fn test_missing_key_selects_nothing() {
        let mut selector = AnimationSelector::by_property("FaceDirection");
        selector.register(FaceDirection::Left, "left");
        assert_eq!(selector.select(&store(FaceDirection::Up)), None);
        // Property not registered at all
        assert_eq!(selector.select(&PropertyStore::new()), None);
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut selector = AnimationSelector::by_property("FaceDirection");
        assert!(selector.register(FaceDirection::Down, "first"));
        assert!(!selector.register(FaceDirection::Down, "second"));
        assert_eq!(selector.len(), 1);
        assert_eq!(selector.get(Selection::Key(FaceDirection::Down)), Some(&"first"));
    }
}
