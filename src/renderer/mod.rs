//! Rendering port
//!
//! The game draws through the [`Renderer`] trait in screen space. Adapters:
//! [`RecordingRenderer`] keeps each presented frame's draw commands, and
//! [`DebugRenderer`] wraps any renderer with geometry overlays.

pub mod debug;
pub mod recording;
pub mod scene;

pub use debug::DebugRenderer;
pub use recording::{DrawCommand, RecordingRenderer};
pub use scene::{PlayerSprites, SceneRenderer};

use glam::Vec2;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// Menu selection highlight
    pub const HIGHLIGHT: Color = Color::YELLOW;
    pub const PLAYER: Color = Color::rgb(70, 130, 230);
    pub const GROUND: Color = Color::rgb(120, 85, 50);
    /// Half-transparent black drawn behind the pause menu
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A texture region with flip flags. Produced by a
/// [`TextureLoader`](crate::platform::TextureLoader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    /// Loader-assigned texture id
    pub texture: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Image {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Screen-space drawing surface
pub trait Renderer {
    fn clear(&mut self);
    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color);
    fn draw_sprite(&mut self, image: &Image, position: Vec2);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);
    /// Finish the frame
    fn present(&mut self);
}
