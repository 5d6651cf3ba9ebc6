use macroquad::math::{vec2, Rect, Vec2};

/// 2D camera in world pixels. The centre is what ends up in the middle of the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
    pub initialized: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            initialized: false,
        }
    }
}

impl Camera {
    pub fn new(zoom: f32) -> Self {
        Self {
            zoom: if zoom > 0.0 { zoom } else { 1.0 },
            ..Default::default()
        }
    }

    /// Centre on `target`, keeping the view inside `map` where the map is big enough
    pub fn follow(&mut self, target: Vec2, map: Rect, screen: Vec2) {
        let half = screen / (2.0 * self.zoom);
        self.center = vec2(clamp_axis(target.x, map.x, map.w, half.x), clamp_axis(target.y, map.y, map.h, half.y));
        self.initialized = true;
    }

    /// World rectangle currently visible on a screen of `screen` pixels
    pub fn view_rect(&self, screen: Vec2) -> Rect {
        let size = screen / self.zoom;
        Rect::new(self.center.x - size.x / 2.0, self.center.y - size.y / 2.0, size.x, size.y)
    }
}

fn clamp_axis(value: f32, start: f32, length: f32, half_view: f32) -> f32 {
    if length <= half_view * 2.0 {
        // Map smaller than the view: keep it centred
        start + length / 2.0
    } else {
        value.clamp(start + half_view, start + length - half_view)
    }
}

/// Convert world coordinates to screen coordinates.
/// Returns pixel-snapped coordinates for crisp rendering
pub fn world_to_screen(world: Vec2, camera: &Camera, screen: Vec2) -> Vec2 {
    ((world - camera.center) * camera.zoom + (screen / 2.0).floor()).round()
}

/// Convert screen (pixel) coordinates to world coordinates
pub fn screen_to_world(point: Vec2, camera: &Camera, screen: Vec2) -> Vec2 {
    (point - (screen / 2.0).floor()) / camera.zoom + camera.center
}
