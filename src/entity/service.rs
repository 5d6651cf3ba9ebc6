use std::collections::HashMap;

use macroquad::math::{Rect, Vec2};

use super::event::BasicEvent;
use super::{EntityData, EntityId, EntityType};
use crate::animation::AnimationFactory;
use crate::message::Message;

/// Entity creation requested by another entity (e.g. a shot arrow)
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub data: EntityData,
    /// Queued before the new entity initialises, delivered right after
    pub init_events: Vec<BasicEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraRequest {
    Track(EntityId),
    Fix(Vec2),
}

/// An entity's window onto the rest of the game.
///
/// Everything that reaches beyond the entity itself (messages, spawning,
/// deletion, camera) is recorded here and applied by the owner after the
/// entity call returns.
pub struct EntityService {
    animations: AnimationFactory,
    std_velocity: f32,
    map_rect: Rect,
    types: HashMap<EntityId, EntityType>,
    outbox: Vec<Message>,
    spawns: Vec<SpawnRequest>,
    deletions: Vec<EntityId>,
    camera: Option<CameraRequest>,
}

impl EntityService {
    pub fn new(animations: AnimationFactory, std_velocity: f32) -> Self {
        Self {
            animations,
            std_velocity,
            map_rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            types: HashMap::new(),
            outbox: Vec::new(),
            spawns: Vec::new(),
            deletions: Vec::new(),
            camera: None,
        }
    }

    pub fn animations(&self) -> &AnimationFactory {
        &self.animations
    }

    /// Default walking speed in pixels per second
    pub fn std_velocity(&self) -> f32 {
        self.std_velocity
    }

    pub fn map_rect(&self) -> Rect {
        self.map_rect
    }

    pub fn set_map_rect(&mut self, rect: Rect) {
        self.map_rect = rect;
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn send_message(&mut self, message: Message) {
        self.outbox.push(message);
    }

    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    // ========================================================================
    // Entity lifecycle
    // ========================================================================

    pub fn create_entity(&mut self, data: EntityData, init_events: Vec<BasicEvent>) {
        self.spawns.push(SpawnRequest { data, init_events });
    }

    pub fn take_spawns(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.spawns)
    }

    pub fn delete_entity(&mut self, id: EntityId) {
        if !self.deletions.contains(&id) {
            self.deletions.push(id);
        }
    }

    pub fn take_deletions(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.deletions)
    }

    pub fn register_type(&mut self, id: EntityId, entity_type: EntityType) {
        self.types.insert(id, entity_type);
    }

    pub fn unregister_type(&mut self, id: EntityId) {
        self.types.remove(&id);
    }

    /// Type of a live entity
    pub fn entity_type(&self, id: EntityId) -> Option<EntityType> {
        self.types.get(&id).copied()
    }

    // ========================================================================
    // Camera
    // ========================================================================

    pub fn track_camera(&mut self, id: EntityId) {
        self.camera = Some(CameraRequest::Track(id));
    }

    pub fn fix_camera(&mut self, position: Vec2) {
        self.camera = Some(CameraRequest::Fix(position));
    }

    pub fn camera_request(&self) -> Option<CameraRequest> {
        self.camera
    }
}
