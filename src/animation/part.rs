use std::fmt::Debug;
use std::hash::Hash;

use macroquad::math::{Rect, Vec2};

use super::collider::ColliderAnimation;
use super::image::ImageAnimation;
use super::selector::{AnimationSelector, Selection};
use super::Animation;
use crate::entity::context::EntityContext;
use crate::entity::property::{Property, PropertyStore};
use crate::render::RenderTarget;

/// Called on every update with the active animation, after it has advanced
pub type UpdateCb<A> = Box<dyn FnMut(&mut EntityContext<'_>, &A)>;

/// Object-safe face of an animation part, as stored by a state
pub trait AnimationPartIf {
    /// Select the animation matching the current properties and restart it.
    /// Returns false (leaving the part inert) when nothing matches.
    fn enter(&mut self, properties: &PropertyStore) -> bool;
    fn update(&mut self, ctx: &mut EntityContext<'_>, delta: f32);
    fn draw_to(&self, target: &mut dyn RenderTarget);
    fn set_position(&mut self, position: Vec2);
    fn set_rotation(&mut self, rotation: f32);
    /// World-space bounding box of the active animation, if it has one
    fn bounds(&self) -> Option<Rect>;
}

/// A family of candidate animations with exactly one active at a time
pub struct AnimationPart<K, A> {
    selector: AnimationSelector<K, A>,
    current: Option<Selection<K>>,
    update_cb: Option<UpdateCb<A>>,
}

pub type ShapePart<K> = AnimationPart<K, ImageAnimation>;
pub type ColliderPart<K> = AnimationPart<K, ColliderAnimation>;

impl<K, A> AnimationPart<K, A>
where
    K: Copy + Eq + Hash + Debug,
    A: Animation,
{
    pub fn new(selector: AnimationSelector<K, A>) -> Self {
        Self {
            selector,
            current: None,
            update_cb: None,
        }
    }

    /// Part with one fixed animation
    pub fn single(animation: A) -> Self {
        Self::new(AnimationSelector::single(animation))
    }

    /// Part whose animation is picked by the current value of a property
    pub fn by_property(name: &str) -> Self
    where
        K: Property + 'static,
    {
        Self::new(AnimationSelector::by_property(name))
    }

    pub fn register_animation(&mut self, key: K, animation: A) -> bool {
        self.selector.register(key, animation)
    }

    pub fn register_update_cb(&mut self, cb: UpdateCb<A>) {
        if self.update_cb.is_some() {
            log::error!("Update callback already registered, keeping the first one");
            return;
        }
        self.update_cb = Some(cb);
    }

    /// Key of the active animation (`None` for single parts or when inert)
    pub fn current_key(&self) -> Option<K> {
        match self.current {
            Some(Selection::Key(key)) => Some(key),
            _ => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&A> {
        self.selector.get(self.current?)
    }

    fn current_mut(&mut self) -> Option<&mut A> {
        let selection = self.current?;
        self.selector.get_mut(selection)
    }
}

impl<K, A> AnimationPartIf for AnimationPart<K, A>
where
    K: Copy + Eq + Hash + Debug,
    A: Animation,
{
    fn enter(&mut self, properties: &PropertyStore) -> bool {
        self.current = self.selector.select(properties);
        match self.current_mut() {
            Some(animation) => {
                animation.restart();
                true
            }
            None => false,
        }
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, delta: f32) {
        let Some(selection) = self.current else {
            return;
        };
        let Some(animation) = self.selector.get_mut(selection) else {
            return;
        };
        animation.update(delta);

        if let Some(cb) = self.update_cb.as_mut() {
            cb(ctx, animation);
        }
    }

    fn draw_to(&self, target: &mut dyn RenderTarget) {
        if let Some(animation) = self.current() {
            animation.draw_to(target);
        }
    }

    fn set_position(&mut self, position: Vec2) {
        if let Some(animation) = self.current_mut() {
            animation.set_position(position);
        }
    }

    fn set_rotation(&mut self, rotation: f32) {
        if let Some(animation) = self.current_mut() {
            animation.set_rotation(rotation);
        }
    }

    fn bounds(&self) -> Option<Rect> {
        self.current()?.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::collider::ColliderFrame;
    use crate::animation::sequence::Sequence;
    use crate::entity::context::TestEntity;
    use crate::game::FaceDirection;
    use crate::render::target::RecordingTarget;
    use crate::render::Image;
    use macroquad::math::vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn image(row: f32, frames: usize) -> ImageAnimation {
        let frames = (0..frames)
            .map(|col| Image {
                sheet: "HeroWalk".into(),
                source: Rect::new(col as f32 * 32.0, row * 32.0, 32.0, 32.0),
                mirror: false,
            })
            .collect();
        ImageAnimation::new(Sequence::with_frames(0.1, frames))
    }

    fn directional_part() -> ShapePart<FaceDirection> {
        let mut part = ShapePart::by_property("FaceDirection");
        for (row, dir) in FaceDirection::ALL.into_iter().enumerate() {
            assert!(part.register_animation(dir, image(row as f32, 2)));
        }
        part
    }

    #[test]
    fn test_enter_selects_current_direction() {
        let mut entity = TestEntity::new();
        entity.properties.register("FaceDirection", FaceDirection::Right);

        let mut part = directional_part();
        assert!(part.enter(&entity.properties));
        assert_eq!(part.current_key(), Some(FaceDirection::Right));

        entity.properties.set("FaceDirection", FaceDirection::Up);
        assert!(part.enter(&entity.properties));
        assert_eq!(part.current_key(), Some(FaceDirection::Up));
    }

    #[test]
    fn test_enter_restarts_animation() {
        let mut entity = TestEntity::new();
        entity.properties.register("FaceDirection", FaceDirection::Left);

        let mut part = directional_part();
        part.enter(&entity.properties);
        part.update(&mut entity.context(), 0.15);
        assert_eq!(part.current().map(|a| a.frame_index()), Some(1));

        part.enter(&entity.properties);
        assert_eq!(part.current().map(|a| a.frame_index()), Some(0));
    }

    #[test]
    fn test_selection_miss_leaves_part_inert() {
        let mut entity = TestEntity::new();
        entity.properties.register("FaceDirection", FaceDirection::Undefined);

        let mut part = directional_part();
        assert!(!part.enter(&entity.properties));
        assert!(!part.is_selected());

        // Inert parts ignore everything else
        part.update(&mut entity.context(), 1.0);
        part.set_position(vec2(10.0, 10.0));
        let mut target = RecordingTarget::default();
        part.draw_to(&mut target);
        assert!(target.images.is_empty());
    }

    #[test]
    fn test_update_cb_sees_completion() {
        let mut entity = TestEntity::new();
        let completed = Rc::new(Cell::new(0));
        let seen = completed.clone();

        let mut part: ShapePart<FaceDirection> = ShapePart::single(image(0.0, 2));
        part.register_update_cb(Box::new(move |_ctx, animation: &ImageAnimation| {
            if animation.is_completed() {
                seen.set(seen.get() + 1);
            }
        }));
        part.enter(&entity.properties);

        part.update(&mut entity.context(), 0.1);
        assert_eq!(completed.get(), 0);
        part.update(&mut entity.context(), 0.1);
        assert_eq!(completed.get(), 1);
    }

    #[test]
    fn test_collider_part_bounds_follow_position() {
        let entity = TestEntity::new();
        let frame = ColliderFrame::sized(vec2(16.0, 16.0));
        let mut part: ColliderPart<FaceDirection> =
            ColliderPart::single(ColliderAnimation::new(Sequence::with_frames(0.1, vec![frame])));

        assert_eq!(part.bounds(), None);
        part.enter(&entity.properties);
        part.set_position(vec2(50.0, 50.0));
        assert_eq!(part.bounds(), Some(Rect::new(42.0, 42.0, 16.0, 16.0)));
    }
}
