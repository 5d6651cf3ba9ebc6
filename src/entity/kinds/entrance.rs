//! Invisible doorway marker. Its `ExitId` names the exit it leads to.

use macroquad::math::Rect;

use super::ColliderDb;
use crate::entity::basic_entity::{Assembly, EntityKind};
use crate::entity::event::EventType;
use crate::entity::property::PropertyStore;
use crate::entity::state::StateType;
use crate::entity::EntityType;
use crate::game::LayerType;
use crate::render::{ColliderData, SheetItem};

pub const ENTRANCE: EntityKind = EntityKind {
    name: "Entrance",
    entity_type: EntityType::Entrance,
    layer: LayerType::Ground,
    is_static: true,
    is_solid: true,
    register_properties,
    assemble,
};

const WALL: Rect = Rect {
    x: 0.0,
    y: 0.0,
    w: 1.0,
    h: 1.0,
};

fn register_properties(properties: &mut PropertyStore) {
    properties.register("ExitId", 0i32);
}

fn assemble(asm: &mut Assembly<'_>) {
    let mut colliders = ColliderDb::new();
    colliders.insert_single(StateType::Idle, vec![ColliderData::new(SheetItem::new("Entrance", 0, 0), WALL)]);

    let factory = asm.service.animations();
    if let Some(idle) = asm.states.state_mut(StateType::Idle) {
        if let Some(wall) = factory.collider_part(&colliders, StateType::Idle, "FaceDirection") {
            idle.register_collider_part(wall);
        }
        idle.register_ignore_events(&[EventType::Collision]);
    }

    let exit_id: i32 = asm.properties.get("ExitId").unwrap_or_default();
    log::debug!("entrance {} leads to exit {}", asm.id, exit_id);
}
