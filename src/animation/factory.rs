use std::fmt::Debug;
use std::hash::Hash;

use macroquad::math::vec2;

use super::collider::{ColliderAnimation, ColliderFrame};
use super::db::AnimationDb;
use super::image::ImageAnimation;
use super::part::{AnimationPart, ColliderPart, ShapePart};
use super::sequence::Sequence;
use super::Animation;
use crate::entity::property::Property;
use crate::entity::StateType;
use crate::render::{ColliderData, ImageData, SheetManager};

/// Builds ready-to-draw animations from sheet descriptors
#[derive(Debug)]
pub struct AnimationFactory {
    sheets: SheetManager,
    switch_time: f32,
}

impl AnimationFactory {
    pub fn new(sheets: SheetManager, switch_time: f32) -> Self {
        Self { sheets, switch_time }
    }

    pub fn sheets(&self) -> &SheetManager {
        &self.sheets
    }

    pub fn switch_time(&self) -> f32 {
        self.switch_time
    }

    pub fn make_animation(&self, images: &[ImageData]) -> ImageAnimation {
        let frames = images.iter().map(|data| self.sheets.make_image(data)).collect();
        ImageAnimation::new(Sequence::with_frames(self.switch_time, frames))
    }

    pub fn make_collider(&self, colliders: &[ColliderData]) -> ColliderAnimation {
        let frames = colliders
            .iter()
            .map(|data| ColliderFrame {
                frame_size: self
                    .sheets
                    .frame_size(&data.item.sheet)
                    .unwrap_or_else(|| vec2(data.rect.w, data.rect.h)),
                rect: data.rect,
            })
            .collect();
        ColliderAnimation::new(Sequence::with_frames(self.switch_time, frames))
    }

    /// Sprite part for one mode of `db`, keyed on the `key_property`
    /// property when the mode has a keyed family
    pub fn shape_part<K>(
        &self,
        db: &AnimationDb<K, Vec<ImageData>>,
        mode: StateType,
        key_property: &str,
    ) -> Option<ShapePart<K>>
    where
        K: Property + Copy + Eq + Hash + Debug + 'static,
    {
        build_part(db, mode, key_property, |images| self.make_animation(images))
    }

    pub fn collider_part<K>(
        &self,
        db: &AnimationDb<K, Vec<ColliderData>>,
        mode: StateType,
        key_property: &str,
    ) -> Option<ColliderPart<K>>
    where
        K: Property + Copy + Eq + Hash + Debug + 'static,
    {
        build_part(db, mode, key_property, |colliders| self.make_collider(colliders))
    }
}

fn build_part<K, D, A>(
    db: &AnimationDb<K, Vec<D>>,
    mode: StateType,
    key_property: &str,
    make: impl Fn(&[D]) -> A,
) -> Option<AnimationPart<K, A>>
where
    K: Property + Copy + Eq + Hash + Debug + 'static,
    A: Animation,
{
    let family = db.family(mode);
    if !family.is_empty() {
        let mut part = AnimationPart::by_property(key_property);
        for (key, data) in family {
            part.register_animation(key, make(data.as_slice()));
        }
        return Some(part);
    }

    match db.single(mode) {
        Some(data) => Some(AnimationPart::single(make(data.as_slice()))),
        None => {
            log::error!("No animations for {:?}", mode);
            None
        }
    }
}
