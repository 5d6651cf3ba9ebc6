use std::rc::Rc;

use macroquad::math::{Rect, Vec2};

use super::context::{EntityContext, Request};
use super::event::{BasicEvent, EventType};
use super::property::PropertyStore;
use super::service::EntityService;
use super::state::StateType;
use super::state_machine::StateMachine;
use super::{EntityData, EntityId, EntityType};
use crate::error::Result;
use crate::game::{Body, LayerType};
use crate::message::{Message, MessageBus, MessageType};
use crate::render::RenderTarget;

pub type HookFn = Box<dyn FnMut(&mut EntityContext<'_>)>;
pub type MessageFn = Box<dyn FnMut(&mut EntityContext<'_>, &Message)>;

/// Optional behaviour a kind plugs into the shared entity lifecycle
#[derive(Default)]
pub struct EntityHooks {
    /// Message types the entity subscribes to while alive
    pub messages: Vec<MessageType>,
    pub on_message: Option<MessageFn>,
    /// Runs before the start state is entered; events raised here are queued
    pub on_init: Option<HookFn>,
    /// Runs on every entry to Idle, after any enter callback the kind registered
    pub on_begin_idle: Option<HookFn>,
    pub on_begin_die: Option<HookFn>,
}

/// What a kind's assembly function gets to work with
pub struct Assembly<'a> {
    pub id: EntityId,
    /// Initial property values, map overrides already applied
    pub properties: &'a PropertyStore,
    pub states: &'a mut StateMachine,
    pub hooks: &'a mut EntityHooks,
    pub service: &'a EntityService,
}

/// Descriptor of an entity kind: static traits plus the functions that
/// build its properties and state graph
#[derive(Clone, Copy)]
pub struct EntityKind {
    pub name: &'static str,
    pub entity_type: EntityType,
    pub layer: LayerType,
    pub is_static: bool,
    pub is_solid: bool,
    pub register_properties: fn(&mut PropertyStore),
    pub assemble: fn(&mut Assembly<'_>),
}

/// A live game actor: a state machine over a body and a property store
pub struct BasicEntity {
    id: EntityId,
    kind: EntityKind,
    data: EntityData,
    body: Body,
    properties: PropertyStore,
    state_machine: StateMachine,
    hooks: EntityHooks,
}

impl BasicEntity {
    pub fn new(id: EntityId, kind: EntityKind, data: EntityData) -> Self {
        Self {
            id,
            kind,
            body: Body::new(data.position),
            data,
            properties: PropertyStore::new(),
            state_machine: StateMachine::new(),
            hooks: EntityHooks::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type
    }

    pub fn layer(&self) -> LayerType {
        self.kind.layer
    }

    pub fn is_static(&self) -> bool {
        self.kind.is_static
    }

    pub fn is_solid(&self) -> bool {
        self.kind.is_solid
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.state_machine
    }

    pub fn current_state(&self) -> StateType {
        self.state_machine.current_state_type()
    }

    pub fn is_initialized(&self) -> bool {
        self.state_machine.is_initialized()
    }

    /// Bus subscriber name of an entity
    pub fn subscriber_name(id: EntityId) -> String {
        format!("entity:{}", id)
    }

    pub fn parse_subscriber(name: &str) -> Option<EntityId> {
        name.strip_prefix("entity:")?.parse().ok()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Build properties and states, subscribe to messages, enter the start
    /// state and deliver queued init events
    pub fn init(&mut self, service: &mut EntityService, bus: &mut MessageBus) -> Result<()> {
        (self.kind.register_properties)(&mut self.properties);
        for (name, raw) in &self.data.properties {
            self.properties.set_from_str(name, raw);
        }

        self.register_base_states();
        let mut assembly = Assembly {
            id: self.id,
            properties: &self.properties,
            states: &mut self.state_machine,
            hooks: &mut self.hooks,
            service: &*service,
        };
        (self.kind.assemble)(&mut assembly);
        self.wire_base_states();

        bus.add_subscriber(&Self::subscriber_name(self.id), &self.hooks.messages);

        let mut ctx = EntityContext::new(self.id, &mut self.body, &mut self.properties, service);
        if let Some(mut on_init) = self.hooks.on_init.take() {
            on_init(&mut ctx);
        }
        // Anything raised before the start state exists waits in the init queue
        while let Some(request) = ctx.next_request() {
            match request {
                Request::Event(event) => self.state_machine.queue_init_events(event),
                Request::ChangeState { state, .. } => {
                    log::error!("entity {}: on_init cannot change state to {:?}", self.id, state)
                }
            }
        }
        self.state_machine.init(&mut ctx)?;

        log::info!("Created {} {} at {:?}", self.kind.name, self.id, self.body.position);
        Ok(())
    }

    pub fn destroy(&mut self, bus: &mut MessageBus) {
        bus.remove_subscriber(&Self::subscriber_name(self.id), &self.hooks.messages);
        log::info!("Destroyed {} {}", self.kind.name, self.id);
    }

    /// Idle (start) and Dead exist for every kind
    fn register_base_states(&mut self) {
        self.state_machine.register_state(StateType::Idle, true);
        if let Some(dead) = self.state_machine.register_state(StateType::Dead, false) {
            dead.ignore_all_events_except(&[]);
        }
    }

    fn wire_base_states(&mut self) {
        let state_types: Vec<StateType> = self.state_machine.state_types().collect();
        for state_type in state_types {
            if state_type == StateType::Dead {
                continue;
            }
            let Some(state) = self.state_machine.state_mut(state_type) else {
                continue;
            };
            if !state.has_event_cb(EventType::Dead) && !state.is_ignored(EventType::Dead) {
                state.register_event_cb(
                    EventType::Dead,
                    Box::new(|ctx, event| ctx.change_state_to(StateType::Dead, Some(event.clone()))),
                );
            }
        }

        if let Some(mut on_begin_idle) = self.hooks.on_begin_idle.take() {
            if let Some(idle) = self.state_machine.state_mut(StateType::Idle) {
                idle.chain_enter_cb(Box::new(move |ctx, _event| on_begin_idle(ctx)));
            }
        }

        let mut on_begin_die = self.hooks.on_begin_die.take();
        if let Some(dead) = self.state_machine.state_mut(StateType::Dead) {
            dead.register_enter_cb(Box::new(move |ctx, _event| {
                if let Some(hook) = on_begin_die.as_mut() {
                    hook(ctx);
                }
                ctx.service.delete_entity(ctx.id);
            }));
        }
    }

    // ========================================================================
    // Per frame
    // ========================================================================

    /// Queue an event for delivery right after initialisation
    pub fn queue_init_events(&mut self, event: BasicEvent) {
        self.state_machine.queue_init_events(event);
    }

    pub fn handle_event(&mut self, service: &mut EntityService, event: BasicEvent) -> Result<()> {
        let mut ctx = EntityContext::new(self.id, &mut self.body, &mut self.properties, service);
        self.state_machine.handle_event(&mut ctx, Rc::new(event))
    }

    pub fn on_message(&mut self, service: &mut EntityService, message: &Message) -> Result<()> {
        let Some(on_message) = self.hooks.on_message.as_mut() else {
            return Ok(());
        };
        let mut ctx = EntityContext::new(self.id, &mut self.body, &mut self.properties, service);
        on_message(&mut ctx, message);
        self.state_machine.process_requests(&mut ctx)
    }

    pub fn update(&mut self, service: &mut EntityService, delta: f32) -> Result<()> {
        let mut ctx = EntityContext::new(self.id, &mut self.body, &mut self.properties, service);
        self.state_machine.update(&mut ctx, delta)
    }

    pub fn draw_to(&self, target: &mut dyn RenderTarget) {
        self.state_machine.draw_to(target);
    }

    // ========================================================================
    // World queries
    // ========================================================================

    pub fn intersect(&self, other: &BasicEntity) -> bool {
        self.state_machine.intersects(&other.state_machine)
    }

    pub fn handle_collision(&mut self, service: &mut EntityService, other: EntityId, is_solid: bool) -> Result<()> {
        self.handle_event(service, BasicEvent::collision(other, is_solid))
    }

    pub fn is_outside_tile_map(&self, map: Rect) -> bool {
        if map.w <= 0.0 || map.h <= 0.0 {
            return false;
        }
        !map.contains(self.body.position)
    }

    pub fn handle_outside_tile_map(&mut self, service: &mut EntityService) -> Result<()> {
        log::debug!("{} {} left the map", self.kind.name, self.id);
        self.handle_event(service, BasicEvent::Dead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationFactory;
    use crate::game::{FaceDirection, MoveDirection};
    use crate::render::SheetManager;
    use crate::entity::ability::MoveAbility;
    use macroquad::input::KeyCode;
    use macroquad::math::vec2;

    fn service() -> EntityService {
        EntityService::new(AnimationFactory::new(SheetManager::new(), 0.1), 100.0)
    }

    fn walker_properties(properties: &mut PropertyStore) {
        properties.register("FaceDirection", FaceDirection::Down);
        properties.register("Speed", 100.0f32);
    }

    /// Idle/Move walker driven by arrow keys
    fn assemble_walker(asm: &mut Assembly<'_>) {
        let speed = asm.properties.get::<f32>("Speed").unwrap_or_default();
        if let Some(idle) = asm.states.state_mut(StateType::Idle) {
            idle.register_event_cb(
                EventType::StartMove,
                Box::new(|ctx, event| ctx.change_state_to(StateType::Move, Some(event.clone()))),
            );
            idle.register_ignore_events(&[EventType::Collision, EventType::StopMove]);
        }
        if let Some(moving) = asm.states.register_state(StateType::Move, false) {
            moving.register_ability(MoveAbility::new(speed));
            moving.register_event_cb(
                EventType::StopMove,
                Box::new(|ctx, _event| ctx.change_state_to(StateType::Idle, None)),
            );
            moving.register_ignore_events(&[EventType::StartMove, EventType::Collision]);
        }

        asm.hooks.messages = vec![MessageType::KeyPressed, MessageType::KeyReleased];
        asm.hooks.on_message = Some(Box::new(|ctx, message| match message {
            Message::KeyPressed(KeyCode::Left) => ctx.handle_event(BasicEvent::start_move(MoveDirection::Left)),
            Message::KeyReleased(KeyCode::Left) => ctx.handle_event(BasicEvent::StopMove),
            _ => {}
        }));
        asm.hooks.on_begin_die = Some(Box::new(|ctx| ctx.service.send_message(Message::GameOver)));
    }

    const WALKER: EntityKind = EntityKind {
        name: "Walker",
        entity_type: EntityType::Player,
        layer: LayerType::Objects,
        is_static: false,
        is_solid: false,
        register_properties: walker_properties,
        assemble: assemble_walker,
    };

    fn walker(data: EntityData) -> (BasicEntity, EntityService, MessageBus) {
        let mut service = service();
        let mut bus = MessageBus::new();
        let mut entity = BasicEntity::new(1, WALKER, data);
        entity.init(&mut service, &mut bus).unwrap();
        (entity, service, bus)
    }

    #[test]
    fn test_init_enters_idle_and_subscribes() {
        let (entity, _service, bus) = walker(EntityData::new("Walker", vec2(10.0, 10.0)));
        assert_eq!(entity.current_state(), StateType::Idle);
        assert!(bus.is_subscribed("entity:1", MessageType::KeyPressed));
        assert_eq!(entity.position(), vec2(10.0, 10.0));
    }

    #[test]
    fn test_map_properties_override_defaults() {
        let data = EntityData::new("Walker", Vec2::ZERO)
            .with_property("FaceDirection", "Up")
            .with_property("Speed", 40.0);
        let (entity, _service, _bus) = walker(data);
        assert_eq!(entity.properties().get::<FaceDirection>("FaceDirection"), Some(FaceDirection::Up));
        assert_eq!(entity.properties().get::<f32>("Speed"), Some(40.0));
    }

    #[test]
    fn test_messages_drive_states() {
        let (mut entity, mut service, _bus) = walker(EntityData::new("Walker", Vec2::ZERO));

        entity.on_message(&mut service, &Message::KeyPressed(KeyCode::Left)).unwrap();
        assert_eq!(entity.current_state(), StateType::Move);
        assert_eq!(entity.properties().get::<FaceDirection>("FaceDirection"), Some(FaceDirection::Left));

        entity.update(&mut service, 0.5).unwrap();
        assert_eq!(entity.position(), vec2(-50.0, 0.0));

        entity.on_message(&mut service, &Message::KeyReleased(KeyCode::Left)).unwrap();
        assert_eq!(entity.current_state(), StateType::Idle);
    }

    #[test]
    fn test_init_events_delivered_after_start_state() {
        let mut service = service();
        let mut bus = MessageBus::new();
        let mut entity = BasicEntity::new(2, WALKER, EntityData::new("Walker", Vec2::ZERO));
        entity.queue_init_events(BasicEvent::start_move(MoveDirection::Left));
        assert_eq!(entity.current_state(), StateType::Uninitialized);

        entity.init(&mut service, &mut bus).unwrap();
        assert_eq!(entity.current_state(), StateType::Move);
    }

    #[test]
    fn test_dead_from_any_state_requests_deletion() {
        let (mut entity, mut service, _bus) = walker(EntityData::new("Walker", Vec2::ZERO));
        entity.on_message(&mut service, &Message::KeyPressed(KeyCode::Left)).unwrap();

        entity.handle_event(&mut service, BasicEvent::Dead).unwrap();
        assert_eq!(entity.current_state(), StateType::Dead);
        assert_eq!(service.take_deletions(), vec![1]);
        assert_eq!(service.take_messages(), vec![Message::GameOver]);

        // Dead swallows everything
        entity.handle_event(&mut service, BasicEvent::start_move(MoveDirection::Up)).unwrap();
        assert_eq!(entity.current_state(), StateType::Dead);
    }

    fn assemble_greeter(asm: &mut Assembly<'_>) {
        if let Some(idle) = asm.states.state_mut(StateType::Idle) {
            idle.register_enter_cb(Box::new(|ctx, _event| ctx.service.send_message(Message::CloseWindow)));
        }
        asm.hooks.on_begin_idle = Some(Box::new(|ctx| ctx.service.send_message(Message::GameOver)));
    }

    #[test]
    fn test_begin_idle_hook_runs_after_kind_enter_cb() {
        let kind = EntityKind {
            name: "Greeter",
            assemble: assemble_greeter,
            ..WALKER
        };
        let mut service = service();
        let mut entity = BasicEntity::new(3, kind, EntityData::new("Greeter", Vec2::ZERO));
        entity.init(&mut service, &mut MessageBus::new()).unwrap();

        assert_eq!(service.take_messages(), vec![Message::CloseWindow, Message::GameOver]);
    }

    #[test]
    fn test_collision_ignored_while_idle() {
        let (mut entity, mut service, _bus) = walker(EntityData::new("Walker", Vec2::ZERO));
        entity.handle_collision(&mut service, 5, true).unwrap();
        assert_eq!(entity.current_state(), StateType::Idle);
    }

    #[test]
    fn test_outside_tile_map() {
        let (entity, _service, _bus) = walker(EntityData::new("Walker", vec2(-5.0, 10.0)));
        assert!(entity.is_outside_tile_map(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(!entity.is_outside_tile_map(Rect::new(-10.0, 0.0, 100.0, 100.0)));
        // No map loaded
        assert!(!entity.is_outside_tile_map(Rect::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_destroy_unsubscribes() {
        let (mut entity, _service, mut bus) = walker(EntityData::new("Walker", Vec2::ZERO));
        entity.destroy(&mut bus);
        assert!(!bus.is_subscribed("entity:1", MessageType::KeyPressed));
    }

    #[test]
    fn test_subscriber_name_roundtrip() {
        assert_eq!(BasicEntity::parse_subscriber(&BasicEntity::subscriber_name(42)), Some(42));
        assert_eq!(BasicEntity::parse_subscriber("game"), None);
    }
}
