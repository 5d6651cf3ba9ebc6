//! Animated sprites and colliders, and the parts that pick between them

pub mod collider;
pub mod db;
pub mod factory;
pub mod image;
pub mod part;
pub mod selector;
pub mod sequence;

use macroquad::math::{Rect, Vec2};

use crate::render::RenderTarget;

pub use collider::{ColliderAnimation, ColliderFrame};
pub use db::AnimationDb;
pub use factory::AnimationFactory;
pub use image::ImageAnimation;
pub use part::{AnimationPart, AnimationPartIf, ColliderPart, ShapePart};
pub use selector::{AnimationSelector, Selection};
pub use sequence::Sequence;

/// A ready-to-draw animation handed out by the [`AnimationFactory`]
pub trait Animation {
    /// Advance the frame timer by `delta` seconds
    fn update(&mut self, delta: f32);
    fn draw_to(&self, target: &mut dyn RenderTarget);
    fn set_position(&mut self, position: Vec2);
    fn set_rotation(&mut self, rotation: f32);
    fn is_completed(&self) -> bool;
    fn restart(&mut self);

    /// World-space collision box, for animations that have one
    fn bounds(&self) -> Option<Rect> {
        None
    }
}
