use std::collections::HashMap;

use super::basic_entity::{BasicEntity, EntityKind};
use super::kinds;
use super::{EntityData, EntityId};
use crate::error::{GameError, Result};

/// Registry of entity kinds by name. Built once at startup and handed
/// to the entity manager.
pub struct EntityFactory {
    kinds: HashMap<String, EntityKind>,
    next_id: EntityId,
}

impl EntityFactory {
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
            next_id: 1,
        }
    }

    /// Factory knowing every kind the game ships with
    pub fn with_default_kinds() -> Self {
        let mut factory = Self::new();
        for kind in kinds::all() {
            factory.register(kind);
        }
        factory
    }

    pub fn register(&mut self, kind: EntityKind) -> bool {
        if self.kinds.contains_key(kind.name) {
            log::error!("Entity kind {} is already registered", kind.name);
            return false;
        }
        self.kinds.insert(kind.name.to_string(), kind);
        true
    }

    pub fn kind(&self, name: &str) -> Option<&EntityKind> {
        self.kinds.get(name)
    }

    /// Build an uninitialised entity with a fresh id
    pub fn create(&mut self, data: EntityData) -> Result<BasicEntity> {
        let Some(kind) = self.kinds.get(&data.type_name).copied() else {
            log::error!("Unknown entity type: {}", data.type_name);
            return Err(GameError::UnknownEntityType(data.type_name));
        };
        let id = self.next_id;
        self.next_id += 1;
        Ok(BasicEntity::new(id, kind, data))
    }
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new()
    }
}
