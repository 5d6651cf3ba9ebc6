//! Moles stand still, or patrol back and forth when the map says so, and
//! die when an arrow hits them

use macroquad::math::{Rect, Vec2};

use super::{add_parts, change_state, die_when_completed, insert_directional, ColliderDb, ImageDb};
use crate::entity::ability::MoveAbility;
use crate::entity::basic_entity::{Assembly, EntityKind};
use crate::entity::event::{BasicEvent, EventType};
use crate::entity::property::PropertyStore;
use crate::entity::state::{EventCb, StateType};
use crate::entity::{EntityContext, EntityType};
use crate::game::{FaceDirection, LayerType, MoveDirection};
use crate::render::ImageData;

pub const MOLE: EntityKind = EntityKind {
    name: "Mole",
    entity_type: EntityType::Mole,
    layer: LayerType::Objects,
    is_static: false,
    is_solid: false,
    register_properties,
    assemble,
};

const COLLIDER: Rect = Rect {
    x: 8.0,
    y: 8.0,
    w: 16.0,
    h: 20.0,
};

/// Moles walk at half the standard speed
const SPEED_FACTOR: f32 = 0.5;

fn register_properties(properties: &mut PropertyStore) {
    properties.register("FaceDirection", FaceDirection::Down);
    properties.register("Patrol", false);
}

fn animations() -> (ImageDb, ColliderDb) {
    let mut images = ImageDb::new();
    let mut colliders = ColliderDb::new();

    insert_directional(
        &mut images,
        Some((&mut colliders, COLLIDER)),
        StateType::Idle,
        ["MoleIdleSide", "MoleIdleFront", "MoleIdleBack"],
        1,
    );
    insert_directional(
        &mut images,
        Some((&mut colliders, COLLIDER)),
        StateType::Move,
        ["MoleWalkSide", "MoleWalkFront", "MoleWalkBack"],
        4,
    );
    let death = (0..6).map(|col| ImageData::new("Death", col, 0)).collect();
    images.insert_single(StateType::Collision, death);

    (images, colliders)
}

fn assemble(asm: &mut Assembly<'_>) {
    let (images, colliders) = animations();
    let service = asm.service;
    let factory = service.animations();
    let velocity = service.std_velocity() * SPEED_FACTOR;

    if let Some(idle) = asm.states.state_mut(StateType::Idle) {
        add_parts(idle, factory, &images, Some(&colliders), StateType::Idle, None);
        idle.register_event_cb(EventType::StartMove, change_state(StateType::Move));
        idle.register_event_cb(EventType::Collision, hit_by_arrow());
        idle.register_ignore_events(&[EventType::StopMove]);
    }

    if let Some(walk) = asm.states.register_state(StateType::Move, false) {
        walk.register_ability(MoveAbility::new(velocity).on_update_move(Box::new(patrol)));
        add_parts(walk, factory, &images, Some(&colliders), StateType::Move, None);
        walk.register_event_cb(EventType::StopMove, change_state(StateType::Idle));
        // Turning around re-enters the state with the new direction
        walk.register_event_cb(EventType::StartMove, change_state(StateType::Move));
        walk.register_event_cb(EventType::Collision, hit_by_arrow());
    }

    if let Some(dying) = asm.states.register_state(StateType::Collision, false) {
        add_parts(dying, factory, &images, None, StateType::Collision, Some(die_when_completed()));
        dying.register_ignore_events(&[EventType::Collision, EventType::StartMove, EventType::StopMove]);
    }

    asm.hooks.on_init = Some(Box::new(|ctx| {
        if ctx.properties.get::<bool>("Patrol").unwrap_or(false) {
            let face: FaceDirection = ctx.properties.get("FaceDirection").unwrap_or_default();
            ctx.handle_event(BasicEvent::start_move(MoveDirection::from_face_direction(face)));
        }
    }));
}

/// Arrows knock the mole out; bumping into anything else does nothing
fn hit_by_arrow() -> EventCb {
    Box::new(|ctx, event| {
        if let BasicEvent::Collision { id, .. } = event.as_ref() {
            if ctx.service.entity_type(*id) == Some(EntityType::Arrow) {
                ctx.change_state_to(StateType::Collision, Some(event.clone()));
            }
        }
    })
}

/// Walk until the next step would leave the map, then turn around
fn patrol(ctx: &mut EntityContext<'_>, delta: Vec2) {
    let next = ctx.body.position + delta;
    let map = ctx.service.map_rect();
    if map.w > 0.0 && map.h > 0.0 && !map.contains(next) {
        let face: FaceDirection = ctx.properties.get("FaceDirection").unwrap_or_default();
        let back = match face {
            FaceDirection::Down => MoveDirection::Up,
            FaceDirection::Up => MoveDirection::Down,
            FaceDirection::Left => MoveDirection::Right,
            FaceDirection::Right => MoveDirection::Left,
            FaceDirection::Undefined => MoveDirection::None,
        };
        ctx.handle_event(BasicEvent::start_move(back));
        return;
    }
    ctx.body.position = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationFactory;
    use crate::entity::basic_entity::BasicEntity;
    use crate::entity::kinds::test_sheets;
    use crate::entity::service::EntityService;
    use crate::entity::EntityData;
    use crate::message::MessageBus;
    use macroquad::math::vec2;

    fn service() -> EntityService {
        let mut service = EntityService::new(AnimationFactory::new(test_sheets(), 0.1), 100.0);
        service.set_map_rect(Rect::new(0.0, 0.0, 200.0, 200.0));
        service
    }

    fn mole(service: &mut EntityService, data: EntityData) -> BasicEntity {
        let mut entity = BasicEntity::new(1, MOLE, data);
        service.register_type(1, EntityType::Mole);
        entity.init(service, &mut MessageBus::new()).unwrap();
        entity
    }

    #[test]
    fn test_mole_stands_still_by_default() {
        let mut service = service();
        let mole = mole(&mut service, EntityData::new("Mole", vec2(50.0, 50.0)));
        assert_eq!(mole.current_state(), StateType::Idle);
    }

    #[test]
    fn test_only_arrows_kill() {
        let mut service = service();
        service.register_type(2, EntityType::Player);
        service.register_type(3, EntityType::Arrow);
        let mut mole = mole(&mut service, EntityData::new("Mole", vec2(50.0, 50.0)));

        mole.handle_collision(&mut service, 2, false).unwrap();
        assert_eq!(mole.current_state(), StateType::Idle);

        mole.handle_collision(&mut service, 3, false).unwrap();
        assert_eq!(mole.current_state(), StateType::Collision);

        // The death animation plays out before the mole goes away
        for _ in 0..5 {
            mole.update(&mut service, 0.1).unwrap();
        }
        assert_eq!(mole.current_state(), StateType::Collision);
        mole.update(&mut service, 0.1).unwrap();
        assert_eq!(mole.current_state(), StateType::Dead);
        assert_eq!(service.take_deletions(), vec![1]);
    }

    #[test]
    fn test_patrol_turns_at_map_edge() {
        let mut service = service();
        let data = EntityData::new("Mole", vec2(180.0, 50.0))
            .with_property("Patrol", true)
            .with_property("FaceDirection", "Right");
        let mut mole = mole(&mut service, data);
        assert_eq!(mole.current_state(), StateType::Move);

        // 50 px/s: the edge is reached within a second
        mole.update(&mut service, 1.0).unwrap();
        assert_eq!(mole.position(), vec2(180.0, 50.0));
        assert_eq!(mole.properties().get::<FaceDirection>("FaceDirection"), Some(FaceDirection::Left));

        mole.update(&mut service, 1.0).unwrap();
        assert_eq!(mole.position(), vec2(130.0, 50.0));
        assert_eq!(mole.current_state(), StateType::Move);
    }
}
