//! Playing-state context
//!
//! `World` owns everything a run mutates. It is created once and restarted for
//! every run; nothing lives outside it.

use crate::error::SimResult;
use crate::settings::Settings;

use super::camera::Camera;
use super::entity::ObjectManager;
use super::physics::PhysicsEngine;
use super::score::ScoreTracker;

#[derive(Debug, Clone)]
pub struct World {
    pub physics: PhysicsEngine,
    pub objects: ObjectManager,
    pub camera: Camera,
    pub score: ScoreTracker,
    /// Base seed; run `n` generates terrain from `seed + n`
    seed: u64,
    runs: u64,
}

impl World {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            physics: PhysicsEngine::new(&settings.physics),
            objects: ObjectManager::new(&settings.player, &settings.terrain, seed),
            camera: Camera::new(&settings.camera),
            score: ScoreTracker::new(),
            seed,
            runs: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of runs started so far
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Tear down any previous run and build a fresh one
    pub fn start(&mut self) -> SimResult<()> {
        self.reset();
        let run_seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;
        self.objects.reseed(run_seed);

        let spawn = self.objects.initialize_objects(&mut self.physics)?;
        self.camera.follow(spawn);
        self.score.initialize_position(spawn.x);
        log::info!("Run {} started (seed {})", self.runs, run_seed);
        Ok(())
    }

    /// Release every body and zero the score
    pub fn reset(&mut self) {
        self.objects.clear(&mut self.physics);
        self.physics.clear();
        self.camera.reset();
        self.score.reset();
    }
}
