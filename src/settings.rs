//! Game settings and tuning
//!
//! Loaded from a JSON file next to the executable. Every section uses
//! `#[serde(default)]`, so a file only needs the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PersistError, SimError, SimResult};
use crate::sim::camera::WorldBounds;

/// Physics engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Gravity magnitude (applied along +y until flipped)
    pub gravity: f32,
    /// Fixed sub-step length in seconds
    pub fixed_step: f32,
    pub max_substeps: u32,
    pub max_set_speed: f32,
    pub max_fall_speed: f32,
    pub max_run_speed: f32,
    pub ground_friction: f32,
    pub ground_normal_threshold: f32,
    pub contact_slop: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            fixed_step: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            max_set_speed: MAX_SET_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            max_run_speed: MAX_RUN_SPEED,
            ground_friction: GROUND_FRICTION,
            ground_normal_threshold: GROUND_NORMAL_THRESHOLD,
            contact_slop: CONTACT_SLOP,
        }
    }
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub size: f32,
    pub mass: f32,
    pub move_force: f32,
    /// Seconds before gravity can be flipped again
    pub flip_cooldown: f32,
    /// Horizontal speed above which a grounded player counts as running
    pub movement_threshold: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            size: PLAYER_SIZE,
            mass: PLAYER_MASS,
            move_force: PLAYER_MOVE_FORCE,
            flip_cooldown: GRAVITY_FLIP_COOLDOWN,
            movement_threshold: MOVEMENT_THRESHOLD,
            spawn_x: PLAYER_SPAWN_X,
            spawn_y: PLAYER_SPAWN_Y,
        }
    }
}

/// Height band for one terrain row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowBand {
    /// Height of the first segment
    pub base: f32,
    pub min: f32,
    pub max: f32,
}

impl RowBand {
    pub fn clamp(&self, height: f32) -> f32 {
        height.clamp(self.min, self.max)
    }
}

/// Terrain generator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub min_gap: f32,
    pub max_gap: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub height_variation: f32,
    pub thickness: f32,
    pub initial_width: f32,
    pub initial_platforms: usize,
    /// Distance ahead of and behind the player that terrain is kept for
    pub view_distance: f32,
    pub bottom: RowBand,
    pub top: RowBand,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            min_gap: MIN_GAP,
            max_gap: MAX_GAP,
            min_width: MIN_PLATFORM_WIDTH,
            max_width: MAX_PLATFORM_WIDTH,
            height_variation: HEIGHT_VARIATION,
            thickness: SEGMENT_THICKNESS,
            initial_width: INITIAL_PLATFORM_WIDTH,
            initial_platforms: INITIAL_PLATFORMS,
            view_distance: VIEW_DISTANCE,
            bottom: RowBand {
                base: BOTTOM_BASE_HEIGHT,
                min: BOTTOM_MIN_HEIGHT,
                max: BOTTOM_MAX_HEIGHT,
            },
            top: RowBand {
                base: TOP_BASE_HEIGHT,
                min: TOP_MIN_HEIGHT,
                max: TOP_MAX_HEIGHT,
            },
        }
    }
}

/// Camera tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub world_bounds: WorldBounds,
    pub death_margin: f32,
    /// Where the followed target sits in the viewport (fractions of width/height)
    pub focus_x: f32,
    pub focus_y: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            world_bounds: WorldBounds::new(0.0, 0.0, WORLD_MAX_X, VIEWPORT_HEIGHT),
            death_margin: DEATH_MARGIN,
            focus_x: CAMERA_FOCUS_X,
            focus_y: CAMERA_FOCUS_Y,
        }
    }
}

/// Session and file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub scores_path: PathBuf,
    pub sprite_sheet: PathBuf,
    pub max_name_length: usize,
    /// Leaderboard rows shown on the main menu
    pub menu_high_scores: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            scores_path: PathBuf::from("scores.json"),
            sprite_sheet: PathBuf::from("assets/player.png"),
            max_name_length: MAX_NAME_LENGTH,
            menu_high_scores: MENU_HIGH_SCORES,
        }
    }
}

/// All runtime settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub player: PlayerSettings,
    pub terrain: TerrainSettings,
    pub camera: CameraSettings,
    pub session: SessionSettings,
    /// Wrap the renderer in the debug overlay
    pub debug_overlay: bool,
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when the file is
    /// missing, malformed or out of range.
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at '{}', using defaults", path.display());
                return Self::default();
            }
        };

        let settings: Settings = match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Malformed settings '{}': {}", path.display(), err);
                return Self::default();
            }
        };

        match settings.validate() {
            Ok(()) => {
                log::info!("Loaded settings from '{}'", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Rejected settings '{}': {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to '{}'", path.display());
        Ok(())
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> SimResult<()> {
        let p = &self.physics;
        positive("physics.gravity", p.gravity)?;
        positive("physics.fixed_step", p.fixed_step)?;
        positive("physics.max_substeps", p.max_substeps as f32)?;
        positive("physics.max_set_speed", p.max_set_speed)?;
        positive("physics.max_fall_speed", p.max_fall_speed)?;
        positive("physics.max_run_speed", p.max_run_speed)?;
        in_range("physics.ground_friction", p.ground_friction, 0.0, 1.0, "[0, 1]")?;
        in_range(
            "physics.ground_normal_threshold",
            p.ground_normal_threshold,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        in_range("physics.contact_slop", p.contact_slop, 0.0, 1.0, "[0, 1]")?;

        let pl = &self.player;
        positive("player.size", pl.size)?;
        positive("player.mass", pl.mass)?;
        in_range("player.flip_cooldown", pl.flip_cooldown, 0.0, 60.0, "[0, 60]")?;

        let t = &self.terrain;
        positive("terrain.min_gap", t.min_gap)?;
        in_range("terrain.max_gap", t.max_gap, t.min_gap, f32::MAX, "[min_gap, inf)")?;
        positive("terrain.min_width", t.min_width)?;
        in_range(
            "terrain.max_width",
            t.max_width,
            t.min_width,
            f32::MAX,
            "[min_width, inf)",
        )?;
        in_range(
            "terrain.height_variation",
            t.height_variation,
            0.0,
            f32::MAX,
            "[0, inf)",
        )?;
        positive("terrain.thickness", t.thickness)?;
        positive("terrain.initial_width", t.initial_width)?;
        positive("terrain.initial_platforms", t.initial_platforms as f32)?;
        positive("terrain.view_distance", t.view_distance)?;
        for (name, band) in [("terrain.bottom", &t.bottom), ("terrain.top", &t.top)] {
            in_range(name, band.max, band.min, f32::MAX, "a band with min <= max")?;
            in_range(name, band.base, band.min, band.max, "its band [min, max]")?;
        }

        let c = &self.camera;
        positive("camera.viewport_width", c.viewport_width)?;
        positive("camera.viewport_height", c.viewport_height)?;
        in_range("camera.death_margin", c.death_margin, 0.0, f32::MAX, "[0, inf)")?;
        in_range("camera.focus_x", c.focus_x, 0.0, 1.0, "[0, 1]")?;
        in_range("camera.focus_y", c.focus_y, 0.0, 1.0, "[0, 1]")?;

        positive(
            "session.max_name_length",
            self.session.max_name_length as f32,
        )?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSetting {
            name,
            value,
            expected: "(0, inf)",
        })
    }
}

fn in_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
    expected: &'static str,
) -> SimResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SimError::InvalidSetting {
            name,
            value,
            expected,
        })
    }
}
