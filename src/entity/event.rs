use std::rc::Rc;

use super::EntityId;
use crate::game::MoveDirection;

/// Tag of a [`BasicEvent`], used for callback lookup and ignore sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Create,
    StartMove,
    StopMove,
    Attack,
    AttackWeapon,
    Collision,
    Dead,
}

/// Discrete trigger delivered to the active state of an entity
#[derive(Debug, Clone, PartialEq)]
pub enum BasicEvent {
    /// Entering the start state during initialisation
    Create,
    StartMove { direction: MoveDirection },
    StopMove,
    Attack,
    AttackWeapon,
    Collision { id: EntityId, is_solid: bool },
    Dead,
}

impl BasicEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            BasicEvent::Create => EventType::Create,
            BasicEvent::StartMove { .. } => EventType::StartMove,
            BasicEvent::StopMove => EventType::StopMove,
            BasicEvent::Attack => EventType::Attack,
            BasicEvent::AttackWeapon => EventType::AttackWeapon,
            BasicEvent::Collision { .. } => EventType::Collision,
            BasicEvent::Dead => EventType::Dead,
        }
    }

    pub fn start_move(direction: MoveDirection) -> Self {
        BasicEvent::StartMove { direction }
    }

    pub fn collision(id: EntityId, is_solid: bool) -> Self {
        BasicEvent::Collision { id, is_solid }
    }
}

/// Events are immutable and shared between the handlers of one dispatch
pub type EventHandle = Rc<BasicEvent>;
