//! Arrows fly straight until they hit a mole or something solid, or leave the map

use macroquad::math::Rect;

use super::{add_parts, change_state, ColliderDb, ImageDb};
use crate::entity::ability::MoveAbility;
use crate::entity::basic_entity::{Assembly, EntityKind};
use crate::entity::event::{BasicEvent, EventType};
use crate::entity::property::PropertyStore;
use crate::entity::state::{EventCb, StateType};
use crate::entity::EntityType;
use crate::game::{FaceDirection, LayerType};
use crate::render::{ColliderData, ImageData, SheetItem};

pub const ARROW: EntityKind = EntityKind {
    name: "Arrow",
    entity_type: EntityType::Arrow,
    layer: LayerType::Objects,
    is_static: false,
    is_solid: false,
    register_properties,
    assemble,
};

/// The sprite points right; the box is the shaft
const COLLIDER: Rect = Rect {
    x: 4.0,
    y: 14.0,
    w: 24.0,
    h: 4.0,
};

const SPEED_FACTOR: f32 = 2.5;

fn register_properties(properties: &mut PropertyStore) {
    properties.register("FaceDirection", FaceDirection::Right);
}

/// Sprite rotation in degrees for a facing
fn rotation(face: FaceDirection) -> f32 {
    match face {
        FaceDirection::Right | FaceDirection::Undefined => 0.0,
        FaceDirection::Down => 90.0,
        FaceDirection::Left => 180.0,
        FaceDirection::Up => 270.0,
    }
}

fn assemble(asm: &mut Assembly<'_>) {
    let mut images = ImageDb::new();
    let mut colliders = ColliderDb::new();
    for mode in [StateType::Idle, StateType::Move] {
        images.insert_single(mode, vec![ImageData::new("Arrow", 0, 0)]);
        colliders.insert_single(mode, vec![ColliderData::new(SheetItem::new("Arrow", 0, 0), COLLIDER)]);
    }

    let service = asm.service;
    let factory = service.animations();

    if let Some(idle) = asm.states.state_mut(StateType::Idle) {
        add_parts(idle, factory, &images, Some(&colliders), StateType::Idle, None);
        idle.register_event_cb(EventType::StartMove, change_state(StateType::Move));
        idle.register_ignore_events(&[EventType::Collision]);
    }

    if let Some(flying) = asm.states.register_state(StateType::Move, false) {
        flying.register_ability(MoveAbility::new(service.std_velocity() * SPEED_FACTOR));
        add_parts(flying, factory, &images, Some(&colliders), StateType::Move, None);
        flying.register_event_cb(EventType::Collision, stop_on_impact());
        flying.register_ignore_events(&[EventType::StartMove, EventType::StopMove]);
    }

    asm.hooks.on_init = Some(Box::new(|ctx| {
        let face: FaceDirection = ctx.properties.get("FaceDirection").unwrap_or_default();
        ctx.body.rotation = rotation(face);
    }));
}

fn stop_on_impact() -> EventCb {
    Box::new(|ctx, event| {
        if let BasicEvent::Collision { id, is_solid } = event.as_ref() {
            if *is_solid || ctx.service.entity_type(*id) == Some(EntityType::Mole) {
                ctx.change_state_to(StateType::Dead, Some(event.clone()));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationFactory;
    use crate::entity::basic_entity::BasicEntity;
    use crate::entity::kinds::test_sheets;
    use crate::entity::service::EntityService;
    use crate::entity::EntityData;
    use crate::game::MoveDirection;
    use crate::message::MessageBus;
    use macroquad::math::vec2;

    fn service() -> EntityService {
        EntityService::new(AnimationFactory::new(test_sheets(), 0.1), 100.0)
    }

    fn arrow(service: &mut EntityService, face: FaceDirection) -> BasicEntity {
        let data = EntityData::new("Arrow", vec2(100.0, 100.0)).with_property("FaceDirection", face);
        let mut entity = BasicEntity::new(1, ARROW, data);
        entity.queue_init_events(BasicEvent::start_move(MoveDirection::from_face_direction(face)));
        entity.init(service, &mut MessageBus::new()).unwrap();
        entity
    }

    #[test]
    fn test_arrow_flies_where_it_faces() {
        let mut service = service();
        let mut arrow = arrow(&mut service, FaceDirection::Up);
        assert_eq!(arrow.current_state(), StateType::Move);

        arrow.update(&mut service, 0.2).unwrap();
        assert_eq!(arrow.position(), vec2(100.0, 50.0));
    }

    #[test]
    fn test_arrow_is_rotated_with_its_collider() {
        let mut service = service();
        let arrow = arrow(&mut service, FaceDirection::Down);
        let bounds = arrow.state_machine().current_state().unwrap().collider_bounds();
        assert_eq!(bounds.len(), 1);
        assert_eq!(bounds[0].w, 4.0);
        assert_eq!(bounds[0].h, 24.0);
    }

    #[test]
    fn test_arrow_passes_through_player_and_stops_at_mole() {
        let mut service = service();
        service.register_type(2, EntityType::Player);
        service.register_type(3, EntityType::Mole);
        let mut arrow = arrow(&mut service, FaceDirection::Right);

        arrow.handle_collision(&mut service, 2, false).unwrap();
        assert_eq!(arrow.current_state(), StateType::Move);

        arrow.handle_collision(&mut service, 3, false).unwrap();
        assert_eq!(arrow.current_state(), StateType::Dead);
        assert_eq!(service.take_deletions(), vec![1]);
    }

    #[test]
    fn test_arrow_stops_at_solid() {
        let mut service = service();
        let mut arrow = arrow(&mut service, FaceDirection::Left);
        arrow.handle_collision(&mut service, 7, true).unwrap();
        assert_eq!(arrow.current_state(), StateType::Dead);
    }
}
