//! Side-scrolling camera
//!
//! The camera keeps its followed target at a fixed fraction of the viewport and
//! clamps its origin to the world bounds. It also answers culling and
//! death-zone queries in world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::CameraSettings;

/// World rectangle the camera origin is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl WorldBounds {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
    bounds: WorldBounds,
    death_margin: f32,
    focus: Vec2,
}

impl Camera {
    pub fn new(settings: &CameraSettings) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            viewport: Vec2::new(settings.viewport_width, settings.viewport_height),
            bounds: settings.world_bounds,
            death_margin: settings.death_margin,
            focus: Vec2::new(settings.focus_x, settings.focus_y),
        };
        camera.reset();
        camera
    }

    /// World-space top-left of the viewport
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Move back to the world origin
    pub fn reset(&mut self) {
        self.position = self.clamp(Vec2::new(self.bounds.min_x, self.bounds.min_y));
    }

    /// Center the view on `target` at the focus ratio, clamped to the world
    pub fn follow(&mut self, target: Vec2) {
        self.position = self.clamp(target - self.viewport * self.focus);
    }

    // Lower bound applied last so degenerate bounds pin to the minimum
    fn clamp(&self, origin: Vec2) -> Vec2 {
        let b = &self.bounds;
        Vec2::new(
            origin.x.min(b.max_x - self.viewport.x).max(b.min_x),
            origin.y.min(b.max_y - self.viewport.y).max(b.min_y),
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    /// Whether a rectangle touches the viewport (edges inclusive)
    pub fn is_in_view(&self, position: Vec2, width: f32, height: f32) -> bool {
        let min = self.position;
        let max = self.position + self.viewport;
        position.x + width >= min.x
            && position.x <= max.x
            && position.y + height >= min.y
            && position.y <= max.y
    }

    /// Whether a point is outside the viewport expanded by the death margin
    pub fn is_in_death_zone(&self, position: Vec2) -> bool {
        let min = self.position - Vec2::splat(self.death_margin);
        let max = self.position + self.viewport + Vec2::splat(self.death_margin);
        position.x < min.x || position.x > max.x || position.y < min.y || position.y > max.y
    }
}
