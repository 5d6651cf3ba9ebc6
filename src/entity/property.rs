use std::collections::HashMap;

use crate::game::FaceDirection;

/// Typed value stored in a [`PropertyStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    FaceDirection(FaceDirection),
    Int(i32),
    Float(f32),
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::FaceDirection(_) => "FaceDirection",
            PropertyValue::Int(_) => "i32",
            PropertyValue::Float(_) => "f32",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Text(_) => "String",
        }
    }

    /// Parse `raw` as a value of the same type as `self`
    pub fn parse_like(&self, raw: &str) -> Option<PropertyValue> {
        let raw = raw.trim();
        match self {
            PropertyValue::FaceDirection(_) => raw.parse().ok().map(PropertyValue::FaceDirection),
            PropertyValue::Int(_) => raw.parse().ok().map(PropertyValue::Int),
            PropertyValue::Float(_) => raw.parse().ok().map(PropertyValue::Float),
            PropertyValue::Bool(_) => raw.parse().ok().map(PropertyValue::Bool),
            PropertyValue::Text(_) => Some(PropertyValue::Text(raw.to_string())),
        }
    }
}

/// Conversion between Rust types and [`PropertyValue`]
pub trait Property: Sized {
    fn into_value(self) -> PropertyValue;
    fn from_value(value: &PropertyValue) -> Option<Self>;
}

macro_rules! impl_property {
    ($ty:ty, $variant:ident) => {
        impl Property for $ty {
            fn into_value(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn from_value(value: &PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_property!(FaceDirection, FaceDirection);
impl_property!(i32, Int);
impl_property!(f32, Float);
impl_property!(bool, Bool);
impl_property!(String, Text);

/// Named, typed values owned by one entity
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: HashMap<String, PropertyValue>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property with its default value. Registering a name twice is an error.
    pub fn register<T: Property>(&mut self, name: &str, default: T) -> bool {
        if self.values.contains_key(name) {
            log::error!("Property {} is already registered", name);
            return false;
        }
        self.values.insert(name.to_string(), default.into_value());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get<T: Property>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_value)
    }

    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Overwrite a registered property. Unknown names and type mismatches
    /// are logged and leave the store untouched.
    pub fn set<T: Property>(&mut self, name: &str, value: T) -> bool {
        let Some(slot) = self.values.get_mut(name) else {
            log::error!("Property {} is not registered", name);
            return false;
        };
        let value = value.into_value();
        if std::mem::discriminant(slot) != std::mem::discriminant(&value) {
            log::error!("Property {} holds {}, not {}", name, slot.type_name(), value.type_name());
            return false;
        }
        *slot = value;
        true
    }

    /// Set a registered property from its textual form, e.g. a map property
    pub fn set_from_str(&mut self, name: &str, raw: &str) -> bool {
        let Some(slot) = self.values.get_mut(name) else {
            log::warn!("Ignoring unknown property {}", name);
            return false;
        };
        match slot.parse_like(raw) {
            Some(value) => {
                *slot = value;
                true
            }
            None => {
                log::warn!("Cannot parse '{}' as {} for property {}", raw, slot.type_name(), name);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut store = PropertyStore::new();
        assert!(store.register("FaceDirection", FaceDirection::Left));
        assert!(store.register("Coins", 0));
        assert_eq!(store.get::<FaceDirection>("FaceDirection"), Some(FaceDirection::Left));
        assert_eq!(store.get::<i32>("Coins"), Some(0));
        // Wrong type and unknown name
        assert_eq!(store.get::<bool>("Coins"), None);
        assert_eq!(store.get::<i32>("Missing"), None);
    }

    #[test]
    fn test_duplicate_register_keeps_first() {
        let mut store = PropertyStore::new();
        store.register("Coins", 1);
        assert!(!store.register("Coins", 5));
        assert_eq!(store.get::<i32>("Coins"), Some(1));
    }

    #[test]
    fn test_set_rejects_unknown_and_mismatch() {
        let mut store = PropertyStore::new();
        store.register("Speed", 1.5f32);
        assert!(store.set("Speed", 2.0f32));
        assert!(!store.set("Speed", true));
        assert!(!store.set("Other", 1));
        assert_eq!(store.get::<f32>("Speed"), Some(2.0));
    }

    #[test]
    fn test_set_from_str() {
        let mut store = PropertyStore::new();
        store.register("FaceDirection", FaceDirection::Down);
        store.register("Patrol", false);
        store.register("ExitId", 0i32);
        store.register("Label", String::new());

        assert!(store.set_from_str("FaceDirection", "Up"));
        assert!(store.set_from_str("Patrol", "true"));
        assert!(store.set_from_str("ExitId", "3"));
        assert!(store.set_from_str("Label", "cave"));
        assert!(!store.set_from_str("Patrol", "maybe"));
        assert!(!store.set_from_str("ExitId", "cave"));
        assert!(!store.set_from_str("Unknown", "1"));

        assert_eq!(store.get::<FaceDirection>("FaceDirection"), Some(FaceDirection::Up));
        assert_eq!(store.get::<bool>("Patrol"), Some(true));
        assert_eq!(store.get::<i32>("ExitId"), Some(3));
        assert_eq!(store.get::<String>("Label"), Some("cave".to_string()));
    }
}
