//! Headless renderer that records draw calls

use glam::Vec2;

use super::{Color, Image, Renderer};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        position: Vec2,
        size: Vec2,
        color: Color,
    },
    Sprite {
        image: Image,
        position: Vec2,
    },
    Text {
        text: String,
        position: Vec2,
        color: Color,
    },
}

/// Collects the current frame's commands and keeps the last presented frame
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.presented
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Text drawn in the last presented frame, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.presented.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.pending.push(DrawCommand::Rect {
            position,
            size,
            color,
        });
    }

    fn draw_sprite(&mut self, image: &Image, position: Vec2) {
        self.pending.push(DrawCommand::Sprite {
            image: *image,
            position,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            position: Vec2::new(x, y),
            color,
        });
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.pending);
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_swaps_frames() {
        let mut renderer = RecordingRenderer::new();
        renderer.draw_text("stale", 0.0, 0.0, Color::WHITE);
        renderer.clear();
        renderer.draw_rect(Vec2::ZERO, Vec2::splat(4.0), Color::RED);
        renderer.draw_text("Score: 3", 5.0, 5.0, Color::WHITE);
        renderer.present();

        assert_eq!(renderer.frames_presented(), 1);
        assert_eq!(renderer.last_frame().len(), 2);
        assert!(renderer.has_text("Score"));
        assert!(!renderer.has_text("stale"));
    }
}
