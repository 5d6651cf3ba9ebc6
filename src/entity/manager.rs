use std::collections::BTreeMap;
use std::rc::Rc;

use macroquad::math::Rect;

use super::basic_entity::BasicEntity;
use super::event::BasicEvent;
use super::factory::EntityFactory;
use super::service::EntityService;
use super::{EntityData, EntityId};
use crate::error::Result;
use crate::game::LayerType;
use crate::message::{Message, MessageBus};
use crate::render::RenderTarget;

/// Owns every live entity and runs them frame by frame.
///
/// Entities are kept ordered by id, so iteration order is stable. An
/// entity is created in one step and initialised at the start of the next
/// update, which leaves room to queue its init events in between.
pub struct EntityManager {
    factory: EntityFactory,
    service: EntityService,
    entities: BTreeMap<EntityId, BasicEntity>,
    pending_init: Vec<EntityId>,
}

impl EntityManager {
    pub fn new(factory: EntityFactory, service: EntityService) -> Self {
        Self {
            factory,
            service,
            entities: BTreeMap::new(),
            pending_init: Vec::new(),
        }
    }

    pub fn service(&self) -> &EntityService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut EntityService {
        &mut self.service
    }

    pub fn get(&self, id: EntityId) -> Option<&BasicEntity> {
        self.entities.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BasicEntity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn create_entity(&mut self, data: EntityData) -> Result<EntityId> {
        let entity = self.factory.create(data)?;
        let id = entity.id();
        self.service.register_type(id, entity.entity_type());
        self.entities.insert(id, entity);
        self.pending_init.push(id);
        Ok(id)
    }

    /// Create an entity that receives `events` right after initialisation
    pub fn create_entity_with_events(&mut self, data: EntityData, events: Vec<BasicEvent>) -> Result<EntityId> {
        let id = self.create_entity(data)?;
        if let Some(entity) = self.entities.get_mut(&id) {
            for event in events {
                entity.queue_init_events(event);
            }
        }
        Ok(id)
    }

    /// Initialise everything created since the last call
    pub fn init_created(&mut self, bus: &mut MessageBus) {
        for id in std::mem::take(&mut self.pending_init) {
            let Some(entity) = self.entities.get_mut(&id) else {
                continue;
            };
            if let Err(e) = entity.init(&mut self.service, bus) {
                log::error!("Failed to initialise entity {}: {}", id, e);
                self.service.delete_entity(id);
            }
        }
    }

    fn remove_entity(&mut self, id: EntityId, bus: &mut MessageBus) {
        if let Some(mut entity) = self.entities.remove(&id) {
            entity.destroy(bus);
            self.service.unregister_type(id);
        }
    }

    // ========================================================================
    // Per frame
    // ========================================================================

    pub fn update(&mut self, delta: f32, bus: &mut MessageBus) {
        self.init_created(bus);

        for (id, entity) in self.entities.iter_mut() {
            if !entity.is_initialized() {
                continue;
            }
            log_failure(*id, entity.update(&mut self.service, delta));
        }

        self.handle_collisions();
        self.handle_outside_tile_map();
        self.handle_spawns();
        self.handle_deletions(bus);

        for message in self.service.take_messages() {
            bus.send(message);
        }
    }

    /// Pairwise collision test; both parties get a collision event
    fn handle_collisions(&mut self) {
        let ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, e)| e.is_initialized())
            .map(|(id, _)| *id)
            .collect();

        let mut hits = Vec::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                let (Some(first), Some(second)) = (self.entities.get(a), self.entities.get(b)) else {
                    continue;
                };
                if first.is_static() && second.is_static() {
                    continue;
                }
                if first.intersect(second) {
                    hits.push((*a, *b, first.is_solid(), second.is_solid()));
                }
            }
        }

        for (a, b, a_solid, b_solid) in hits {
            if let Some(first) = self.entities.get_mut(&a) {
                log_failure(a, first.handle_collision(&mut self.service, b, b_solid));
            }
            if let Some(second) = self.entities.get_mut(&b) {
                log_failure(b, second.handle_collision(&mut self.service, a, a_solid));
            }
        }
    }

    fn handle_outside_tile_map(&mut self) {
        let map = self.service.map_rect();
        for (id, entity) in self.entities.iter_mut() {
            if entity.is_initialized() && entity.is_outside_tile_map(map) {
                log_failure(*id, entity.handle_outside_tile_map(&mut self.service));
            }
        }
    }

    fn handle_spawns(&mut self) {
        for spawn in self.service.take_spawns() {
            if let Err(e) = self.create_entity_with_events(spawn.data, spawn.init_events) {
                log::error!("Failed to spawn entity: {}", e);
            }
        }
    }

    fn handle_deletions(&mut self, bus: &mut MessageBus) {
        for id in self.service.take_deletions() {
            self.remove_entity(id, bus);
        }
    }

    /// Route a bus delivery to the entity it is addressed to
    pub fn handle_message(&mut self, subscriber: &str, message: &Rc<Message>) {
        let Some(id) = BasicEntity::parse_subscriber(subscriber) else {
            return;
        };
        if let Some(entity) = self.entities.get_mut(&id) {
            log_failure(id, entity.on_message(&mut self.service, message));
        }
    }

    /// Draw the entities of one layer, skipping those far outside `view`
    pub fn draw_to(&self, target: &mut dyn RenderTarget, layer: LayerType, view: Option<Rect>) {
        for entity in self.entities.values() {
            if entity.layer() != layer {
                continue;
            }
            if let Some(view) = view {
                let margin = 64.0;
                let padded = Rect::new(view.x - margin, view.y - margin, view.w + 2.0 * margin, view.h + 2.0 * margin);
                if !padded.contains(entity.position()) {
                    continue;
                }
            }
            entity.draw_to(target);
        }
    }

    /// Destroy everything, unsubscribing from the bus
    pub fn clear(&mut self, bus: &mut MessageBus) {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.remove_entity(id, bus);
        }
        self.pending_init.clear();
    }
}

fn log_failure(id: EntityId, result: Result<()>) {
    if let Err(e) = result {
        log::error!("Entity {}: {}", id, e);
    }
}
