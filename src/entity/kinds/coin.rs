//! A spinning coin lying on the ground

use super::{add_parts, ImageDb};
use crate::entity::basic_entity::{Assembly, EntityKind};
use crate::entity::event::EventType;
use crate::entity::property::PropertyStore;
use crate::entity::state::StateType;
use crate::entity::EntityType;
use crate::game::LayerType;
use crate::render::ImageData;

pub const COIN: EntityKind = EntityKind {
    name: "Coin",
    entity_type: EntityType::Coin,
    layer: LayerType::Ground,
    is_static: true,
    is_solid: false,
    register_properties,
    assemble,
};

fn register_properties(_properties: &mut PropertyStore) {}

fn assemble(asm: &mut Assembly<'_>) {
    let mut images = ImageDb::new();
    images.insert_single(StateType::Idle, (0..4).map(|col| ImageData::new("Coin", col, 0)).collect());

    let factory = asm.service.animations();
    if let Some(idle) = asm.states.state_mut(StateType::Idle) {
        add_parts(idle, factory, &images, None, StateType::Idle, None);
        idle.register_ignore_events(&[EventType::Collision]);
    }
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
    use crate::render::target::RecordingTarget;
    use macroquad::math::vec2;

    #[test]
    fn test_coin_spins() {
        let mut service = EntityService::new(AnimationFactory::new(test_sheets(), 0.1), 100.0);
        let mut coin = BasicEntity::new(1, COIN, EntityData::new("Coin", vec2(40.0, 40.0)));
        coin.init(&mut service, &mut MessageBus::new()).unwrap();

        coin.update(&mut service, 0.25).unwrap();
        let mut target = RecordingTarget::default();
        coin.draw_to(&mut target);
        assert_eq!(target.images.len(), 1);
        assert_eq!(target.images[0].0.source.x, 32.0);

        // Coins are scenery: bumping into one changes nothing
        coin.handle_collision(&mut service, 2, false).unwrap();
        assert_eq!(coin.current_state(), StateType::Idle);
    }
}
