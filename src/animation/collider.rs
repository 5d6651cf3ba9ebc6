use macroquad::color::RED;
use macroquad::math::{vec2, Rect, Vec2};

use super::sequence::Sequence;
use super::Animation;
use crate::render::RenderTarget;

/// Collision rectangle of one frame, in pixels relative to the frame's top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderFrame {
    pub frame_size: Vec2,
    pub rect: Rect,
}

impl ColliderFrame {
    /// A collider covering a whole frame of `size`
    pub fn sized(size: Vec2) -> Self {
        Self {
            frame_size: size,
            rect: Rect::new(0.0, 0.0, size.x, size.y),
        }
    }
}

/// Animated collision box; frames follow the matching sprite animation
#[derive(Debug, Clone)]
pub struct ColliderAnimation {
    sequence: Sequence<ColliderFrame>,
    position: Vec2,
    rotation: f32,
}

impl ColliderAnimation {
    pub fn new(sequence: Sequence<ColliderFrame>) -> Self {
        Self {
            sequence,
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Current collision rectangle in world coordinates.
    /// Frames are centred on the position, like sprites.
    pub fn world_rect(&self) -> Option<Rect> {
        let frame = self.sequence.current()?;
        let origin = self.position - frame.frame_size / 2.0;
        // Quarter turns swap the box extents around the frame centre
        let quarter_turn = (self.rotation.rem_euclid(180.0) - 90.0).abs() < 1.0;
        if quarter_turn {
            let center = origin + vec2(frame.rect.x + frame.rect.w / 2.0, frame.rect.y + frame.rect.h / 2.0);
            return Some(Rect::new(
                center.x - frame.rect.h / 2.0,
                center.y - frame.rect.w / 2.0,
                frame.rect.h,
                frame.rect.w,
            ));
        }
        Some(Rect::new(origin.x + frame.rect.x, origin.y + frame.rect.y, frame.rect.w, frame.rect.h))
    }

    pub fn intersects(&self, other: &ColliderAnimation) -> bool {
        match (self.world_rect(), other.world_rect()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}

impl Animation for ColliderAnimation {
    fn update(&mut self, delta: f32) {
        self.sequence.update(delta);
    }

    fn draw_to(&self, target: &mut dyn RenderTarget) {
        if !target.debug_colliders() {
            return;
        }
        if let Some(rect) = self.world_rect() {
            target.draw_rect_outline(rect, RED);
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

    fn bounds(&self) -> Option<Rect> {
        self.world_rect()
    }
}
