//! Flip Runner - a gravity-flipping side-scroller
//!
//! Core modules:
//! - `sim`: Gameplay simulation (physics, terrain streaming, entities, camera, scoring)
//! - `game`: Frame loop and the menu/pause/game-over state machine
//! - `renderer`: Renderer port, scene drawing and the debug decorator
//! - `platform`: Input, clock and texture ports with headless adapters
//! - `persistence`: High score storage
//! - `settings`: Data-driven tuning

pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AssetError, PersistError, SimError, SimResult};
pub use game::{Game, GameState};
pub use highscores::{HighScoreEntry, HighScores};
pub use settings::Settings;

use glam::Vec2;

/// 2D float vector used throughout the simulation
pub type Vector2D = Vec2;

/// Game configuration constants
///
/// These are the defaults behind [`Settings`]; the settings file overrides them at runtime.
pub mod consts {
    /// Fixed physics sub-step (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum sub-steps per update to bound work after a long stall
    pub const MAX_SUBSTEPS: u32 = 60;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Downward gravity (pixels/s², +y is down)
    pub const GRAVITY: f32 = 600.0;
    /// Per-axis cap applied by `set_velocity`
    pub const MAX_SET_SPEED: f32 = 400.0;
    /// Vertical speed cap applied after integration
    pub const MAX_FALL_SPEED: f32 = 500.0;
    /// Horizontal speed cap applied after integration
    pub const MAX_RUN_SPEED: f32 = 300.0;
    /// Fraction of horizontal speed a grounded body keeps per second
    pub const GROUND_FRICTION: f32 = 0.3;
    /// A contact grounds a body when `normal · gravity_dir` is below the negated threshold
    pub const GROUND_NORMAL_THRESHOLD: f32 = 0.7;
    /// Separation under which two boxes still count as touching
    pub const CONTACT_SLOP: f32 = 0.01;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_MASS: f32 = 50.0;
    pub const PLAYER_MOVE_FORCE: f32 = 15_000.0;
    pub const GRAVITY_FLIP_COOLDOWN: f32 = 0.5;
    pub const MOVEMENT_THRESHOLD: f32 = 10.0;
    pub const PLAYER_SPAWN_X: f32 = 200.0;
    pub const PLAYER_SPAWN_Y: f32 = 400.0;

    /// Terrain defaults
    pub const SEGMENT_THICKNESS: f32 = 32.0;
    pub const MIN_GAP: f32 = 100.0;
    pub const MAX_GAP: f32 = 200.0;
    pub const MIN_PLATFORM_WIDTH: f32 = 150.0;
    pub const MAX_PLATFORM_WIDTH: f32 = 300.0;
    pub const HEIGHT_VARIATION: f32 = 50.0;
    pub const INITIAL_PLATFORM_WIDTH: f32 = 300.0;
    pub const INITIAL_PLATFORMS: usize = 5;
    pub const VIEW_DISTANCE: f32 = 1000.0;
    pub const BOTTOM_BASE_HEIGHT: f32 = 500.0;
    pub const BOTTOM_MIN_HEIGHT: f32 = 400.0;
    pub const BOTTOM_MAX_HEIGHT: f32 = 550.0;
    pub const TOP_BASE_HEIGHT: f32 = 100.0;
    pub const TOP_MIN_HEIGHT: f32 = 50.0;
    pub const TOP_MAX_HEIGHT: f32 = 200.0;

    /// Camera defaults
    pub const DEATH_MARGIN: f32 = 100.0;
    pub const CAMERA_FOCUS_X: f32 = 1.0 / 3.0;
    pub const CAMERA_FOCUS_Y: f32 = 0.5;
    /// Horizontal world extent (effectively unbounded to the right)
    pub const WORLD_MAX_X: f32 = 1.0e9;

    /// Session defaults
    pub const MAX_NAME_LENGTH: usize = 20;
    pub const MENU_HIGH_SCORES: usize = 5;
}

/// Axis-aligned overlap test between two rectangles given as top-left + size
#[inline]
pub fn rects_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_a.x + size_a.x > pos_b.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_a.y + size_a.y > pos_b.y
}

/// Clamp each component of `v` to `[-limit, limit]`
#[inline]
pub fn clamp_per_axis(v: Vec2, limit: Vec2) -> Vec2 {
    Vec2::new(v.x.clamp(-limit.x, limit.x), v.y.clamp(-limit.y, limit.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_ops() {
        let a = Vector2D::new(3.0, 4.0);
        let b = Vector2D::new(1.0, -1.0);
        assert_eq!(a + b, Vector2D::new(4.0, 3.0));
        assert_eq!(a * 2.0, Vector2D::new(6.0, 8.0));
        assert!((a.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rects_overlap() {
        let size = Vec2::splat(10.0);
        assert!(rects_overlap(Vec2::ZERO, size, Vec2::new(5.0, 5.0), size));
        // Touching edges do not overlap
        assert!(!rects_overlap(Vec2::ZERO, size, Vec2::new(10.0, 0.0), size));
        assert!(!rects_overlap(Vec2::ZERO, size, Vec2::new(0.0, 20.0), size));
    }

    #[test]
    fn test_clamp_per_axis() {
        let v = clamp_per_axis(Vec2::new(900.0, -900.0), Vec2::new(400.0, 500.0));
        assert_eq!(v, Vec2::new(400.0, -500.0));
    }
}
