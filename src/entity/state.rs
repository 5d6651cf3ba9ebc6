use std::collections::{HashMap, HashSet};

use macroquad::math::Rect;

use super::ability::Ability;
use super::context::EntityContext;
use super::event::{EventHandle, EventType};
use crate::animation::AnimationPartIf;
use crate::render::RenderTarget;

/// Behavioural mode of an entity. One state per type per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateType {
    Uninitialized,
    Idle,
    Move,
    Attack,
    AttackWeapon,
    Collision,
    Dead,
}

pub type EventCb = Box<dyn FnMut(&mut EntityContext<'_>, &EventHandle)>;
pub type EnterCb = Box<dyn FnMut(&mut EntityContext<'_>, Option<&EventHandle>)>;
pub type ExitCb = Box<dyn FnMut(&mut EntityContext<'_>)>;

/// What a state did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
    Unhandled,
}

/// One behavioural mode: abilities, animation parts and event reactions
/// bound together while the mode is active
pub struct State {
    state_type: StateType,
    abilities: Vec<Box<dyn Ability>>,
    shape_parts: Vec<Box<dyn AnimationPartIf>>,
    collider_parts: Vec<Box<dyn AnimationPartIf>>,
    event_cbs: HashMap<EventType, EventCb>,
    ignored: HashSet<EventType>,
    /// When set, only these event types get past the ignore check
    allow_only: Option<HashSet<EventType>>,
    enter_cb: Option<EnterCb>,
    exit_cb: Option<ExitCb>,
    active: bool,
}

impl State {
    pub fn new(state_type: StateType) -> Self {
        Self {
            state_type,
            abilities: Vec::new(),
            shape_parts: Vec::new(),
            collider_parts: Vec::new(),
            event_cbs: HashMap::new(),
            ignored: HashSet::new(),
            allow_only: None,
            enter_cb: None,
            exit_cb: None,
            active: false,
        }
    }

    pub fn state_type(&self) -> StateType {
        self.state_type
    }

    /// Entered and not yet exited
    pub fn is_active(&self) -> bool {
        self.active
    }

    // ========================================================================
    // Registration (entity setup only)
    // ========================================================================

    pub fn register_ability(&mut self, ability: impl Ability + 'static) {
        self.abilities.push(Box::new(ability));
    }

    pub fn register_shape_part(&mut self, part: impl AnimationPartIf + 'static) {
        self.shape_parts.push(Box::new(part));
    }

    pub fn register_collider_part(&mut self, part: impl AnimationPartIf + 'static) {
        self.collider_parts.push(Box::new(part));
    }

    /// One callback per event type; a second registration is rejected
    pub fn register_event_cb(&mut self, event_type: EventType, cb: EventCb) -> bool {
        if self.event_cbs.contains_key(&event_type) {
            log::error!("{:?}: callback for {:?} already registered", self.state_type, event_type);
            return false;
        }
        self.event_cbs.insert(event_type, cb);
        true
    }

    pub fn has_event_cb(&self, event_type: EventType) -> bool {
        self.event_cbs.contains_key(&event_type)
    }

    pub fn register_ignore_events(&mut self, events: &[EventType]) {
        self.ignored.extend(events.iter().copied());
    }

    /// Drop every event whose type is not in `allowed`
    pub fn ignore_all_events_except(&mut self, allowed: &[EventType]) {
        self.allow_only = Some(allowed.iter().copied().collect());
    }

    pub fn is_ignored(&self, event_type: EventType) -> bool {
        if let Some(allowed) = &self.allow_only {
            if !allowed.contains(&event_type) {
                return true;
            }
        }
        self.ignored.contains(&event_type)
    }

    pub fn register_enter_cb(&mut self, cb: EnterCb) -> bool {
        if self.enter_cb.is_some() {
            log::error!("{:?}: enter callback already registered", self.state_type);
            return false;
        }
        self.enter_cb = Some(cb);
        true
    }

    /// Run `cb` after the enter callback already registered, if any
    pub fn chain_enter_cb(&mut self, mut cb: EnterCb) {
        let chained: EnterCb = match self.enter_cb.take() {
            Some(mut first) => Box::new(move |ctx: &mut EntityContext<'_>, event: Option<&EventHandle>| {
                first(ctx, event);
                cb(ctx, event);
            }),
            None => cb,
        };
        self.enter_cb = Some(chained);
    }

    pub fn register_exit_cb(&mut self, cb: ExitCb) -> bool {
        if self.exit_cb.is_some() {
            log::error!("{:?}: exit callback already registered", self.state_type);
            return false;
        }
        self.exit_cb = Some(cb);
        true
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Enter callback, then abilities, then shape parts, then collider parts
    pub fn enter(&mut self, ctx: &mut EntityContext<'_>, event: Option<&EventHandle>) {
        self.active = true;

        if let Some(cb) = self.enter_cb.as_mut() {
            cb(ctx, event);
        }
        for ability in &mut self.abilities {
            ability.enter(ctx, event);
        }

        let position = ctx.body.position;
        let rotation = ctx.body.rotation;
        for part in self.shape_parts.iter_mut().chain(self.collider_parts.iter_mut()) {
            if !part.enter(ctx.properties) {
                log::error!("entity {}: {:?} has a part with no matching animation", ctx.id, self.state_type);
            }
            part.set_position(position);
            part.set_rotation(rotation);
        }
    }

    pub fn exit(&mut self, ctx: &mut EntityContext<'_>) {
        if let Some(cb) = self.exit_cb.as_mut() {
            cb(ctx);
        }
        for ability in &mut self.abilities {
            ability.exit(ctx);
        }
        self.active = false;
    }

    /// Abilities move the body first, then the parts animate and follow it
    pub fn update(&mut self, ctx: &mut EntityContext<'_>, delta: f32) {
        for ability in &mut self.abilities {
            ability.update(ctx, delta);
        }

        for part in self.shape_parts.iter_mut().chain(self.collider_parts.iter_mut()) {
            part.update(ctx, delta);
            part.set_position(ctx.body.position);
            part.set_rotation(ctx.body.rotation);
        }
    }

    pub fn draw_to(&self, target: &mut dyn RenderTarget) {
        for part in self.shape_parts.iter().chain(self.collider_parts.iter()) {
            part.draw_to(target);
        }
    }

    /// World-space boxes of the active collider animations
    pub fn collider_bounds(&self) -> Vec<Rect> {
        self.collider_parts.iter().filter_map(|part| part.bounds()).collect()
    }

    pub fn intersects(&self, other: &State) -> bool {
        let theirs = other.collider_bounds();
        self.collider_bounds()
            .iter()
            .any(|mine| theirs.iter().any(|their| mine.overlaps(their)))
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn handle_event(&mut self, ctx: &mut EntityContext<'_>, event: &EventHandle) -> Dispatch {
        let event_type = event.event_type();
        if self.is_ignored(event_type) {
            log::debug!("entity {}: {:?} ignores {:?}", ctx.id, self.state_type, event_type);
            return Dispatch::Ignored;
        }

        match self.event_cbs.get_mut(&event_type) {
            Some(cb) => {
                cb(ctx, event);
                Dispatch::Handled
            }
            None => {
                log::error!("entity {}: {:?} has no handler for {:?}", ctx.id, self.state_type, event_type);
                Dispatch::Unhandled
            }
        }
    }
}
