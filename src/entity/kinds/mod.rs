//! The entity kinds the game ships with

pub mod arrow;
pub mod coin;
pub mod entrance;
pub mod mole;
pub mod player;

use macroquad::math::Rect;

use super::basic_entity::EntityKind;
use super::event::BasicEvent;
use super::state::{EventCb, State, StateType};
use crate::animation::part::UpdateCb;
use crate::animation::{Animation, AnimationDb, AnimationFactory, ImageAnimation};
use crate::game::FaceDirection;
use crate::render::{ColliderData, ImageData, SheetItem};

pub type ImageDb = AnimationDb<FaceDirection, Vec<ImageData>>;
pub type ColliderDb = AnimationDb<FaceDirection, Vec<ColliderData>>;

pub fn all() -> Vec<EntityKind> {
    vec![player::PLAYER, mole::MOLE, arrow::ARROW, coin::COIN, entrance::ENTRANCE]
}

/// The first `count` cells of row 0
fn frames(sheet: &str, count: u32) -> Vec<SheetItem> {
    (0..count).map(|col| SheetItem::new(sheet, col, 0)).collect()
}

/// Register a four-way animation for `mode`: the side sheet faces right and
/// is mirrored for left
fn insert_directional(
    images: &mut ImageDb,
    colliders: Option<(&mut ColliderDb, Rect)>,
    mode: StateType,
    sheets: [&str; 3],
    count: u32,
) {
    let [side, front, back] = sheets;
    let layout = [
        (FaceDirection::Left, side, true),
        (FaceDirection::Right, side, false),
        (FaceDirection::Down, front, false),
        (FaceDirection::Up, back, false),
    ];

    for (dir, sheet, mirror) in layout {
        let data = frames(sheet, count)
            .into_iter()
            .map(|item| ImageData { item, mirror })
            .collect();
        images.insert(mode, dir, data);
    }

    if let Some((colliders, rect)) = colliders {
        for (dir, sheet, _) in layout {
            let data = frames(sheet, count)
                .into_iter()
                .map(|item| ColliderData::new(item, rect))
                .collect();
            colliders.insert(mode, dir, data);
        }
    }
}

/// Attach the sprite part (and collider part, when the tables have one)
/// of `mode` to `state`
fn add_parts(
    state: &mut State,
    factory: &AnimationFactory,
    images: &ImageDb,
    colliders: Option<&ColliderDb>,
    mode: StateType,
    update_cb: Option<UpdateCb<ImageAnimation>>,
) {
    if let Some(mut shape) = factory.shape_part(images, mode, "FaceDirection") {
        if let Some(cb) = update_cb {
            shape.register_update_cb(cb);
        }
        state.register_shape_part(shape);
    }
    if let Some(colliders) = colliders.filter(|db| db.has_mode(mode)) {
        if let Some(collider) = factory.collider_part(colliders, mode, "FaceDirection") {
            state.register_collider_part(collider);
        }
    }
}

/// Event callback that moves to `state`, passing the event along
fn change_state(state: StateType) -> EventCb {
    Box::new(move |ctx, event| ctx.change_state_to(state, Some(event.clone())))
}

/// Raise `Dead` once the animation has played through
fn die_when_completed() -> UpdateCb<ImageAnimation> {
    Box::new(|ctx, animation: &ImageAnimation| {
        if animation.is_completed() {
            ctx.handle_event(BasicEvent::Dead);
        }
    })
}

/// Sheet layouts matching `assets/sheets.toml`, for tests that build entities without textures
#[cfg(test)]
pub fn test_sheets() -> crate::render::SheetManager {
    use macroquad::math::vec2;

    let layout: [(&str, u32, f32); 21] = [
        ("HeroIdleSide", 1, 32.0),
        ("HeroIdleFront", 1, 32.0),
        ("HeroIdleBack", 1, 32.0),
        ("HeroWalkSide", 6, 32.0),
        ("HeroWalkFront", 6, 32.0),
        ("HeroWalkBack", 6, 32.0),
        ("HeroAttackSide", 3, 32.0),
        ("HeroAttackFront", 3, 32.0),
        ("HeroAttackBack", 3, 32.0),
        ("HeroAttackWeaponSide", 3, 32.0),
        ("HeroAttackWeaponFront", 3, 32.0),
        ("HeroAttackWeaponBack", 3, 32.0),
        ("MoleIdleSide", 1, 32.0),
        ("MoleIdleFront", 1, 32.0),
        ("MoleIdleBack", 1, 32.0),
        ("MoleWalkSide", 4, 32.0),
        ("MoleWalkFront", 4, 32.0),
        ("MoleWalkBack", 4, 32.0),
        ("Death", 6, 32.0),
        ("Arrow", 1, 32.0),
        ("Coin", 4, 16.0),
    ];

    let mut sheets = crate::render::SheetManager::new();
    for (id, columns, size) in layout {
        sheets.add_sheet(id.into(), vec2(columns as f32 * size, size), columns, 1);
    }
    sheets
}
