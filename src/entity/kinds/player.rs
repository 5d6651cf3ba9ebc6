//! The hero: walks with the arrow keys, swings with right control and
//! shoots arrows with space

use macroquad::input::KeyCode;
use macroquad::math::{vec2, Rect, Vec2};

use super::{add_parts, change_state, insert_directional, ColliderDb, ImageDb};
use crate::animation::part::UpdateCb;
use crate::animation::{Animation, ImageAnimation};
use crate::entity::ability::MoveAbility;
use crate::entity::basic_entity::{Assembly, EntityKind};
use crate::entity::event::{BasicEvent, EventType};
use crate::entity::property::PropertyStore;
use crate::entity::state::StateType;
use crate::entity::{EntityContext, EntityData, EntityType};
use crate::game::{FaceDirection, LayerType, MoveDirection};
use crate::message::{Message, MessageType};

pub const PLAYER: EntityKind = EntityKind {
    name: "Player",
    entity_type: EntityType::Player,
    layer: LayerType::Objects,
    is_static: false,
    is_solid: false,
    register_properties,
    assemble,
};

const COLLIDER: Rect = Rect {
    x: 9.0,
    y: 8.0,
    w: 14.0,
    h: 22.0,
};

/// Keeps the hero this far inside the map edges
const MAP_MARGIN: f32 = 8.0;

fn register_properties(properties: &mut PropertyStore) {
    properties.register("FaceDirection", FaceDirection::Down);
}

fn animations() -> (ImageDb, ColliderDb) {
    let mut images = ImageDb::new();
    let mut colliders = ColliderDb::new();

    let table: [(StateType, [&str; 3], u32); 4] = [
        (StateType::Idle, ["HeroIdleSide", "HeroIdleFront", "HeroIdleBack"], 1),
        (StateType::Move, ["HeroWalkSide", "HeroWalkFront", "HeroWalkBack"], 6),
        (StateType::Attack, ["HeroAttackSide", "HeroAttackFront", "HeroAttackBack"], 3),
        (
            StateType::AttackWeapon,
            ["HeroAttackWeaponSide", "HeroAttackWeaponFront", "HeroAttackWeaponBack"],
            3,
        ),
    ];
    for (mode, sheets, frames) in table {
        insert_directional(&mut images, Some((&mut colliders, COLLIDER)), mode, sheets, frames);
    }

    (images, colliders)
}

fn assemble(asm: &mut Assembly<'_>) {
    let (images, colliders) = animations();
    let service = asm.service;
    let factory = service.animations();
    let velocity = service.std_velocity();

    if let Some(idle) = asm.states.state_mut(StateType::Idle) {
        add_parts(idle, factory, &images, Some(&colliders), StateType::Idle, None);
        idle.register_event_cb(EventType::StartMove, change_state(StateType::Move));
        idle.register_event_cb(EventType::Attack, change_state(StateType::Attack));
        idle.register_event_cb(EventType::AttackWeapon, change_state(StateType::AttackWeapon));
        idle.register_ignore_events(&[EventType::StopMove, EventType::Collision]);
    }

    if let Some(walk) = asm.states.register_state(StateType::Move, false) {
        walk.register_ability(MoveAbility::new(velocity).on_update_move(Box::new(move_inside_map)));
        add_parts(walk, factory, &images, Some(&colliders), StateType::Move, None);
        walk.register_event_cb(EventType::StopMove, change_state(StateType::Idle));
        walk.register_ignore_events(&[
            EventType::StartMove,
            EventType::Attack,
            EventType::AttackWeapon,
            EventType::Collision,
        ]);
    }

    if let Some(attack) = asm.states.register_state(StateType::Attack, false) {
        let back_to_idle: UpdateCb<ImageAnimation> = Box::new(|ctx, animation| {
            if animation.is_completed() {
                ctx.change_state_to(StateType::Idle, None);
            }
        });
        add_parts(attack, factory, &images, Some(&colliders), StateType::Attack, Some(back_to_idle));
        attack.register_event_cb(EventType::StartMove, change_state(StateType::Move));
        attack.register_ignore_events(&[
            EventType::StopMove,
            EventType::Attack,
            EventType::AttackWeapon,
            EventType::Collision,
        ]);
    }

    if let Some(shoot) = asm.states.register_state(StateType::AttackWeapon, false) {
        let release: UpdateCb<ImageAnimation> = Box::new(|ctx, animation| {
            if animation.is_completed() {
                shoot_arrow(ctx);
                ctx.change_state_to(StateType::Idle, None);
            }
        });
        add_parts(shoot, factory, &images, Some(&colliders), StateType::AttackWeapon, Some(release));
        shoot.register_event_cb(EventType::StartMove, change_state(StateType::Move));
        shoot.register_ignore_events(&[
            EventType::StopMove,
            EventType::Attack,
            EventType::AttackWeapon,
            EventType::Collision,
        ]);
    }

    asm.hooks.messages = vec![MessageType::IsKeyPressed, MessageType::KeyReleased, MessageType::KeyPressed];
    asm.hooks.on_message = Some(Box::new(on_message));
    asm.hooks.on_init = Some(Box::new(|ctx| ctx.service.track_camera(ctx.id)));
    asm.hooks.on_begin_die = Some(Box::new(|ctx| {
        ctx.service.send_message(Message::GameOver);
        ctx.service.fix_camera(ctx.body.position);
    }));
}

fn on_message(ctx: &mut EntityContext<'_>, message: &Message) {
    match message {
        Message::IsKeyPressed(key) => match key {
            KeyCode::Right => ctx.handle_event(BasicEvent::start_move(MoveDirection::Right)),
            KeyCode::Left => ctx.handle_event(BasicEvent::start_move(MoveDirection::Left)),
            KeyCode::Down => ctx.handle_event(BasicEvent::start_move(MoveDirection::Down)),
            KeyCode::Up => ctx.handle_event(BasicEvent::start_move(MoveDirection::Up)),
            KeyCode::RightControl => ctx.handle_event(BasicEvent::Attack),
            KeyCode::Space => ctx.handle_event(BasicEvent::AttackWeapon),
            _ => {}
        },
        Message::KeyReleased(KeyCode::Right | KeyCode::Left | KeyCode::Down | KeyCode::Up) => {
            ctx.handle_event(BasicEvent::StopMove)
        }
        Message::KeyPressed(KeyCode::Key1) => ctx.handle_event(BasicEvent::Dead),
        _ => {}
    }
}

fn move_inside_map(ctx: &mut EntityContext<'_>, delta: Vec2) {
    let next = ctx.body.position + delta;
    let map = ctx.service.map_rect();
    ctx.body.position = if map.w > 2.0 * MAP_MARGIN && map.h > 2.0 * MAP_MARGIN {
        let min = map.point() + Vec2::splat(MAP_MARGIN);
        let max = map.point() + map.size() - Vec2::splat(MAP_MARGIN);
        next.clamp(min, max)
    } else {
        next
    };
}

/// Where the arrow appears relative to the hero, per facing
fn arrow_offset(face: FaceDirection) -> Vec2 {
    match face {
        FaceDirection::Down => vec2(0.0, 15.0),
        FaceDirection::Left => vec2(-15.0, 5.0),
        FaceDirection::Right => vec2(15.0, 5.0),
        FaceDirection::Up => vec2(0.0, -15.0),
        FaceDirection::Undefined => Vec2::ZERO,
    }
}

fn shoot_arrow(ctx: &mut EntityContext<'_>) {
    let face: FaceDirection = ctx.properties.get("FaceDirection").unwrap_or_default();
    let data = EntityData::new("Arrow", ctx.body.position + arrow_offset(face)).with_property("FaceDirection", face);
    log::debug!("entity {}: shooting {} at {:?}", ctx.id, face, data.position);
    ctx.service
        .create_entity(data, vec![BasicEvent::start_move(MoveDirection::from_face_direction(face))]);
}
