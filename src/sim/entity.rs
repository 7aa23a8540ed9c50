//! Game objects backed by physics bodies
//!
//! Entities hold a [`BodyHandle`] and their drawn footprint. Position and
//! velocity always come from the physics engine.

use glam::Vec2;

use super::ground::GroundGenerator;
use super::physics::{BodyHandle, PhysicsEngine};
use super::tick::TickInput;
use crate::error::SimResult;
use crate::settings::{PlayerSettings, TerrainSettings};

/// Body handle plus rendered size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameObject {
    body: BodyHandle,
    size: Vec2,
}

impl GameObject {
    pub fn new(body: BodyHandle, size: Vec2) -> Self {
        Self { body, size }
    }

    pub fn handle(&self) -> BodyHandle {
        self.body
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn position(&self, physics: &PhysicsEngine) -> SimResult<Vec2> {
        physics.get_position(self.body)
    }

    pub fn velocity(&self, physics: &PhysicsEngine) -> SimResult<Vec2> {
        physics.get_velocity(self.body)
    }

    pub fn set_position(&self, physics: &mut PhysicsEngine, position: Vec2) -> SimResult<()> {
        physics.set_position(self.body, position)
    }

    pub fn set_velocity(&self, physics: &mut PhysicsEngine, velocity: Vec2) -> SimResult<()> {
        physics.set_velocity(self.body, velocity)
    }

    pub fn apply_force(&self, physics: &mut PhysicsEngine, force: Vec2) -> SimResult<()> {
        physics.apply_force(self.body, force)
    }
}

/// What an object is, for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Ground,
}

/// Player animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerMotion {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Pick the motion state from grounded flag, velocity and current gravity
pub fn select_motion(
    grounded: bool,
    velocity: Vec2,
    gravity: Vec2,
    threshold: f32,
) -> PlayerMotion {
    if grounded {
        if velocity.x.abs() > threshold {
            PlayerMotion::Run
        } else {
            PlayerMotion::Idle
        }
    } else if velocity.y * gravity.y < 0.0 {
        PlayerMotion::Jump
    } else {
        PlayerMotion::Fall
    }
}

/// The player-controlled body
#[derive(Debug, Clone)]
pub struct Player {
    object: GameObject,
    settings: PlayerSettings,
    flip_cooldown: f32,
    motion: PlayerMotion,
    facing: Facing,
}

impl Player {
    pub fn spawn(physics: &mut PhysicsEngine, settings: &PlayerSettings) -> SimResult<Self> {
        let size = Vec2::splat(settings.size);
        let position = Vec2::new(settings.spawn_x, settings.spawn_y);
        let body = physics.create_dynamic_body(position, size, settings.mass)?;
        Ok(Self {
            object: GameObject::new(body, size),
            settings: settings.clone(),
            flip_cooldown: 0.0,
            motion: PlayerMotion::Idle,
            facing: Facing::Right,
        })
    }

    pub fn object(&self) -> &GameObject {
        &self.object
    }

    pub fn motion(&self) -> PlayerMotion {
        self.motion
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Seconds until gravity can be flipped again
    pub fn flip_cooldown(&self) -> f32 {
        self.flip_cooldown
    }

    pub fn is_grounded(&self, physics: &PhysicsEngine) -> SimResult<bool> {
        physics.is_grounded(self.object.handle())
    }

    pub fn move_left(&self, physics: &mut PhysicsEngine) -> SimResult<()> {
        self.object
            .apply_force(physics, Vec2::new(-self.settings.move_force, 0.0))
    }

    pub fn move_right(&self, physics: &mut PhysicsEngine) -> SimResult<()> {
        self.object
            .apply_force(physics, Vec2::new(self.settings.move_force, 0.0))
    }

    /// Flip gravity if grounded and off cooldown. Returns whether it flipped.
    pub fn try_flip_gravity(&mut self, physics: &mut PhysicsEngine) -> SimResult<bool> {
        if self.flip_cooldown > 0.0 || !self.is_grounded(physics)? {
            return Ok(false);
        }
        physics.flip_gravity();
        self.flip_cooldown = self.settings.flip_cooldown;
        log::debug!("Player flipped gravity (inverted={})", physics.is_gravity_inverted());
        Ok(true)
    }

    /// Apply held controls. Left wins when both directions are held.
    pub fn handle_input(
        &mut self,
        physics: &mut PhysicsEngine,
        input: &TickInput,
    ) -> SimResult<()> {
        if input.left {
            self.move_left(physics)?;
        } else if input.right {
            self.move_right(physics)?;
        }
        if input.jump {
            self.try_flip_gravity(physics)?;
        }
        Ok(())
    }

    /// Tick the cooldown and refresh motion and facing from the body
    pub fn update(&mut self, physics: &PhysicsEngine, dt: f32) -> SimResult<()> {
        self.flip_cooldown = (self.flip_cooldown - dt).max(0.0);

        let velocity = self.object.velocity(physics)?;
        let grounded = self.is_grounded(physics)?;
        self.motion = select_motion(
            grounded,
            velocity,
            physics.gravity(),
            self.settings.movement_threshold,
        );
        if velocity.x > 0.0 {
            self.facing = Facing::Right;
        } else if velocity.x < 0.0 {
            self.facing = Facing::Left;
        }
        Ok(())
    }
}

/// Immovable terrain piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSegment {
    object: GameObject,
}

impl GroundSegment {
    pub fn spawn(
        physics: &mut PhysicsEngine,
        x: f32,
        y: f32,
        width: f32,
        thickness: f32,
    ) -> SimResult<Self> {
        let body = physics.create_ground_segment(Vec2::new(x, y), width, thickness)?;
        Ok(Self {
            object: GameObject::new(body, Vec2::new(width, thickness)),
        })
    }

    pub fn object(&self) -> &GameObject {
        &self.object
    }

    pub fn width(&self) -> f32 {
        self.object.size().x
    }

    pub fn thickness(&self) -> f32 {
        self.object.size().y
    }
}

/// Owns the player and the terrain generator
#[derive(Debug, Clone)]
pub struct ObjectManager {
    player_settings: PlayerSettings,
    terrain_settings: TerrainSettings,
    player: Option<Player>,
    ground: GroundGenerator,
}

impl ObjectManager {
    pub fn new(player: &PlayerSettings, terrain: &TerrainSettings, seed: u64) -> Self {
        Self {
            player_settings: player.clone(),
            terrain_settings: terrain.clone(),
            player: None,
            ground: GroundGenerator::new(terrain, seed),
        }
    }

    /// Replace the terrain generator with one seeded for a new run
    pub fn reseed(&mut self, seed: u64) {
        self.ground = GroundGenerator::new(&self.terrain_settings, seed);
    }

    /// Spawn the player and the opening terrain. Returns the player position.
    pub fn initialize_objects(&mut self, physics: &mut PhysicsEngine) -> SimResult<Vec2> {
        self.clear(physics);
        let player = Player::spawn(physics, &self.player_settings)?;
        self.ground
            .generate_initial_platforms(physics, self.terrain_settings.initial_platforms)?;
        let position = player.object().position(physics)?;
        self.player = Some(player);
        log::info!(
            "Objects initialized: player at ({:.0}, {:.0}), {} segments",
            position.x,
            position.y,
            self.ground.segment_count()
        );
        Ok(position)
    }

    /// Stream terrain around the player, then update the player
    pub fn update(&mut self, physics: &mut PhysicsEngine, dt: f32) -> SimResult<()> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };
        let x = player.object().position(physics)?.x;
        self.ground
            .update(physics, x, self.terrain_settings.view_distance)?;
        player.update(physics, dt)
    }

    /// Release the player and all terrain
    pub fn clear(&mut self, physics: &mut PhysicsEngine) {
        if let Some(player) = self.player.take() {
            if let Err(err) = physics.remove_body(player.object().handle()) {
                log::debug!("Player body already released: {}", err);
            }
        }
        self.ground.clear(physics);
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn ground(&self) -> &GroundGenerator {
        &self.ground
    }

    /// Everything drawable, player first
    pub fn objects(&self) -> impl Iterator<Item = (EntityKind, GameObject)> + '_ {
        self.player
            .iter()
            .map(|player| (EntityKind::Player, *player.object()))
            .chain(
                self.ground
                    .segments()
                    .map(|s| (EntityKind::Ground, *s.segment.object())),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::PhysicsSettings;

    fn physics() -> PhysicsEngine {
        PhysicsEngine::new(&PhysicsSettings::default())
    }

    /// Player standing on a wide floor
    fn grounded_player(physics: &mut PhysicsEngine) -> Player {
        physics
            .create_static_body(Vec2::new(0.0, 432.0), Vec2::new(1000.0, 32.0))
            .unwrap();
        let player = Player::spawn(physics, &PlayerSettings::default()).unwrap();
        physics.update(SIM_DT);
        assert!(player.is_grounded(physics).unwrap());
        player
    }

    #[test]
    fn test_select_motion() {
        let down = Vec2::new(0.0, 600.0);
        let up = -down;
        assert_eq!(select_motion(true, Vec2::new(50.0, 0.0), down, 10.0), PlayerMotion::Run);
        assert_eq!(select_motion(true, Vec2::new(5.0, 0.0), down, 10.0), PlayerMotion::Idle);
        assert_eq!(select_motion(false, Vec2::new(0.0, -20.0), down, 10.0), PlayerMotion::Jump);
        assert_eq!(select_motion(false, Vec2::new(0.0, 20.0), down, 10.0), PlayerMotion::Fall);
        // Inverted gravity: moving down is against gravity
        assert_eq!(select_motion(false, Vec2::new(0.0, 20.0), up, 10.0), PlayerMotion::Jump);
    }

    #[test]
    fn test_flip_requires_ground() {
        let mut physics = physics();
        let mut player = Player::spawn(&mut physics, &PlayerSettings::default()).unwrap();
        assert!(!player.try_flip_gravity(&mut physics).unwrap());
        assert!(!physics.is_gravity_inverted());
    }

    #[test]
    fn test_flip_cooldown() {
        let mut physics = physics();
        let mut player = grounded_player(&mut physics);
        assert!(player.try_flip_gravity(&mut physics).unwrap());
        assert!(physics.is_gravity_inverted());
        assert_eq!(player.flip_cooldown(), 0.5);

        // Still on cooldown
        assert!(!player.try_flip_gravity(&mut physics).unwrap());
        player.update(&physics, 0.6).unwrap();
        assert_eq!(player.flip_cooldown(), 0.0);
        assert_eq!(player.motion(), PlayerMotion::Idle);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut physics = physics();
        let mut player = Player::spawn(&mut physics, &PlayerSettings::default()).unwrap();
        let input = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        player.handle_input(&mut physics, &input).unwrap();
        physics.update(SIM_DT);
        player.update(&physics, SIM_DT).unwrap();

        assert!(player.object().velocity(&physics).unwrap().x < 0.0);
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_running_on_ground() {
        let mut physics = physics();
        let mut player = grounded_player(&mut physics);
        for _ in 0..30 {
            player.move_right(&mut physics).unwrap();
            physics.update(SIM_DT);
            player.update(&physics, SIM_DT).unwrap();
        }
        assert_eq!(player.motion(), PlayerMotion::Run);
        assert_eq!(player.facing(), Facing::Right);
    }

    #[test]
    fn test_object_manager_lifecycle() {
        let mut physics = physics();
        let mut manager = ObjectManager::new(
            &PlayerSettings::default(),
            &TerrainSettings::default(),
            11,
        );
        let position = manager.initialize_objects(&mut physics).unwrap();
        assert_eq!(position, Vec2::new(200.0, 400.0));
        // Player plus 5 pairs of segments
        assert_eq!(physics.body_count(), 11);

        let kinds: Vec<_> = manager.objects().map(|(kind, _)| kind).collect();
        assert_eq!(kinds[0], EntityKind::Player);
        assert_eq!(kinds.len(), 11);
        assert!(kinds[1..].iter().all(|k| *k == EntityKind::Ground));

        manager.update(&mut physics, SIM_DT).unwrap();
        assert!(manager.ground().last_platform_end() >= 200.0 + 1000.0);

        manager.clear(&mut physics);
        assert!(manager.player().is_none());
        assert_eq!(physics.body_count(), 0);
    }
}
