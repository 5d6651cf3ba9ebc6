use macroquad::math::Vec2;

use super::context::EntityContext;
use super::event::{BasicEvent, EventHandle};
use crate::game::MoveDirection;

/// Per-frame behaviour attached to a state, independent of how it looks
pub trait Ability {
    fn enter(&mut self, ctx: &mut EntityContext<'_>, event: Option<&EventHandle>);

    fn exit(&mut self, _ctx: &mut EntityContext<'_>) {}

    fn update(&mut self, ctx: &mut EntityContext<'_>, delta: f32);
}

pub type BeginMoveCb = Box<dyn FnMut(&mut EntityContext<'_>, MoveDirection)>;
pub type UpdateMoveCb = Box<dyn FnMut(&mut EntityContext<'_>, Vec2)>;

/// Keeps moving the body in the direction of the `StartMove` that entered the state
pub struct MoveAbility {
    velocity: f32,
    direction: MoveDirection,
    on_begin_move: BeginMoveCb,
    on_update_move: UpdateMoveCb,
}

impl MoveAbility {
    pub fn new(velocity: f32) -> Self {
        Self {
            velocity,
            direction: MoveDirection::None,
            on_begin_move: Box::new(default_begin_move),
            on_update_move: Box::new(default_update_move),
        }
    }

    /// Replace the hook run when movement starts
    pub fn on_begin_move(mut self, cb: BeginMoveCb) -> Self {
        self.on_begin_move = cb;
        self
    }

    /// Replace the hook that applies each frame's displacement
    pub fn on_update_move(mut self, cb: UpdateMoveCb) -> Self {
        self.on_update_move = cb;
        self
    }

    pub fn direction(&self) -> MoveDirection {
        self.direction
    }
}

/// Face the way we're going, for entities that have a facing
pub fn default_begin_move(ctx: &mut EntityContext<'_>, direction: MoveDirection) {
    if ctx.properties.contains("FaceDirection") {
        ctx.properties.set("FaceDirection", direction.to_face_direction());
    }
}

pub fn default_update_move(ctx: &mut EntityContext<'_>, delta: Vec2) {
    ctx.body.position += delta;
}

impl Ability for MoveAbility {
    fn enter(&mut self, ctx: &mut EntityContext<'_>, event: Option<&EventHandle>) {
        self.direction = match event.map(|e| e.as_ref()) {
            Some(BasicEvent::StartMove { direction }) => *direction,
            other => {
                log::warn!("entity {}: move entered without a direction ({:?})", ctx.id, other);
                MoveDirection::None
            }
        };
        (self.on_begin_move)(ctx, self.direction);
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, delta: f32) {
        if self.direction == MoveDirection::None {
            return;
        }
        let displacement = self.direction.unit_vector() * self.velocity * delta;
        (self.on_update_move)(ctx, displacement);
    }
}
