//! Entities: state machines, their states, and the registry that builds them

pub mod ability;
pub mod basic_entity;
pub mod context;
pub mod event;
pub mod factory;
pub mod kinds;
pub mod manager;
pub mod property;
pub mod service;
pub mod state;
pub mod state_machine;

use macroquad::math::Vec2;
use std::collections::HashMap;

pub use ability::{Ability, MoveAbility};
pub use basic_entity::{Assembly, BasicEntity, EntityHooks, EntityKind};
pub use context::EntityContext;
pub use event::{BasicEvent, EventHandle, EventType};
pub use factory::EntityFactory;
pub use manager::EntityManager;
pub use property::{Property, PropertyStore, PropertyValue};
pub use service::{EntityService, SpawnRequest};
pub use state::{Dispatch, State, StateType};
pub use state_machine::StateMachine;

/// Unique entity identifier, never reused while the game runs
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Player,
    Mole,
    Arrow,
    Coin,
    Entrance,
}

/// Everything needed to spawn an entity: its kind name, where, and its
/// initial property values as strings (as they come from the map)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityData {
    pub type_name: String,
    pub position: Vec2,
    pub properties: HashMap<String, String>,
}

impl EntityData {
    pub fn new(type_name: &str, position: Vec2) -> Self {
        Self {
            type_name: type_name.to_string(),
            position,
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: impl ToString) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }
}
