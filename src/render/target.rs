use macroquad::prelude::*;

use super::camera::{world_to_screen, Camera};
use super::sheet::{Image, TextureStore};

/// Anything that can receive the drawables of one frame
pub trait RenderTarget {
    /// Draw `image` centred on `position`, rotated by `rotation` degrees
    fn draw_image(&mut self, image: &Image, position: Vec2, rotation: f32);

    fn draw_rect_outline(&mut self, rect: Rect, color: Color);

    /// Whether collider outlines should be drawn
    fn debug_colliders(&self) -> bool {
        false
    }
}

/// Draws straight to the macroquad screen using the loaded sheet textures,
/// seen through a camera
pub struct ScreenTarget<'a> {
    textures: &'a TextureStore,
    camera: &'a Camera,
    screen: Vec2,
    debug_colliders: bool,
}

impl<'a> ScreenTarget<'a> {
    pub fn new(textures: &'a TextureStore, camera: &'a Camera, debug_colliders: bool) -> Self {
        Self {
            textures,
            camera,
            screen: vec2(screen_width(), screen_height()),
            debug_colliders,
        }
    }
}

impl RenderTarget for ScreenTarget<'_> {
    fn draw_image(&mut self, image: &Image, position: Vec2, rotation: f32) {
        let Some(texture) = self.textures.get(&image.sheet) else {
            return;
        };

        let size = image.size() * self.camera.zoom;
        let top_left = world_to_screen(position, self.camera, self.screen) - size / 2.0;

        draw_texture_ex(
            texture,
            top_left.x,
            top_left.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(size),
                source: Some(image.source),
                rotation: rotation.to_radians(),
                flip_x: image.mirror,
                ..Default::default()
            },
        );
    }

    fn draw_rect_outline(&mut self, rect: Rect, color: Color) {
        let top_left = world_to_screen(rect.point(), self.camera, self.screen);
        let size = rect.size() * self.camera.zoom;
        draw_rectangle_lines(top_left.x, top_left.y, size.x, size.y, 1.0, color);
    }

    fn debug_colliders(&self) -> bool {
        self.debug_colliders
    }
}

/// Render target that records draw calls instead of touching the GPU
#[cfg(test)]
#[derive(Default)]
pub struct RecordingTarget {
    pub images: Vec<(Image, Vec2, f32)>,
    pub rects: Vec<Rect>,
    pub debug: bool,
}

#[cfg(test)]
impl RenderTarget for RecordingTarget {
    fn draw_image(&mut self, image: &Image, position: Vec2, rotation: f32) {
        self.images.push((image.clone(), position, rotation));
    }

    fn draw_rect_outline(&mut self, rect: Rect, _color: Color) {
        self.rects.push(rect);
    }

    fn debug_colliders(&self) -> bool {
        self.debug
    }
}
