use macroquad::math::Vec2;

use super::sequence::Sequence;
use super::Animation;
use crate::render::{Image, RenderTarget};

/// Sprite animation: a sequence of sheet images drawn centred on a position
#[derive(Debug, Clone)]
pub struct ImageAnimation {
    sequence: Sequence<Image>,
    position: Vec2,
    rotation: f32,
}

impl ImageAnimation {
    pub fn new(sequence: Sequence<Image>) -> Self {
        Self {
            sequence,
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    pub fn current_image(&self) -> Option<&Image> {
        self.sequence.current()
    }

    pub fn frame_index(&self) -> usize {
        self.sequence.index()
    }
}

impl Animation for ImageAnimation {
    fn update(&mut self, delta: f32) {
        self.sequence.update(delta);
    }

    fn draw_to(&self, target: &mut dyn RenderTarget) {
        if let Some(image) = self.sequence.current() {
            target.draw_image(image, self.position, self.rotation);
        }
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    fn is_completed(&self) -> bool {
        self.sequence.is_completed()
    }

    fn restart(&mut self) {
        self.sequence.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::target::RecordingTarget;
    use macroquad::math::{vec2, Rect};

    fn image(col: f32) -> Image {
        Image {
            sheet: "Coin".into(),
            source: Rect::new(col * 16.0, 0.0, 16.0, 16.0),
            mirror: false,
        }
    }

    #[test]
    fn test_draws_current_frame_at_position() {
        let mut animation = ImageAnimation::new(Sequence::with_frames(0.1, vec![image(0.0), image(1.0)]));
        animation.set_position(vec2(40.0, 50.0));
        animation.set_rotation(90.0);
        animation.update(0.15);

        let mut target = RecordingTarget::default();
        animation.draw_to(&mut target);

        assert_eq!(target.images.len(), 1);
        let (drawn, position, rotation) = &target.images[0];
        assert_eq!(drawn.source.x, 16.0);
        assert_eq!(*position, vec2(40.0, 50.0));
        assert_eq!(*rotation, 90.0);
    }
}
