//! Debug overlay decorator
//!
//! Forwards every call to the wrapped renderer and, while enabled, adds a
//! bounding outline, a center marker and position/size labels to rectangles and
//! sprites.

use glam::Vec2;

use super::{Color, Image, Renderer};

const MARKER_SIZE: f32 = 4.0;
const LABEL_COLOR: Color = Color::YELLOW;

#[derive(Debug, Clone)]
pub struct DebugRenderer<R> {
    inner: R,
    enabled: bool,
}

impl<R: Renderer> DebugRenderer<R> {
    pub fn new(inner: R, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn outline(&mut self, position: Vec2, size: Vec2) {
        let edges = [
            (position, Vec2::new(size.x, 1.0)),
            (Vec2::new(position.x, position.y + size.y - 1.0), Vec2::new(size.x, 1.0)),
            (position, Vec2::new(1.0, size.y)),
            (Vec2::new(position.x + size.x - 1.0, position.y), Vec2::new(1.0, size.y)),
        ];
        for (edge, extent) in edges {
            self.inner.draw_rect(edge, extent, Color::GREEN);
        }
    }

    fn annotate(&mut self, position: Vec2, size: Vec2) {
        self.outline(position, size);

        let center = position + size * 0.5;
        self.inner.draw_rect(
            center - Vec2::splat(MARKER_SIZE * 0.5),
            Vec2::splat(MARKER_SIZE),
            Color::RED,
        );

        let label = format!("({},{})", position.x as i32, position.y as i32);
        self.inner
            .draw_text(&label, position.x, position.y - 20.0, LABEL_COLOR);
        let label = format!("{}x{}", size.x as i32, size.y as i32);
        self.inner
            .draw_text(&label, position.x, position.y - 40.0, LABEL_COLOR);
    }
}

impl<R: Renderer> Renderer for DebugRenderer<R> {
    fn clear(&mut self) {
        self.inner.clear();
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.inner.draw_rect(position, size, color);
        if self.enabled {
            self.annotate(position, size);
        }
    }

    fn draw_sprite(&mut self, image: &Image, position: Vec2) {
        self.inner.draw_sprite(image, position);
        if self.enabled {
            self.outline(position, image.size());
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.inner.draw_text(text, x, y, color);
    }

    fn present(&mut self) {
        self.inner.present();
    }
}
