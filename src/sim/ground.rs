//! Streaming terrain generator
//!
//! Keeps two parallel rows of ground segments (floor and ceiling) around the
//! player. Both rows share gap and width per step; heights follow independent
//! bounded random walks clamped to each row's band.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::GroundSegment;
use super::physics::PhysicsEngine;
use crate::error::SimResult;
use crate::settings::{RowBand, TerrainSettings};

/// Terrain row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Bottom,
    Top,
}

impl Row {
    pub const ALL: [Row; 2] = [Row::Bottom, Row::Top];
}

/// A placed segment and the geometry it was generated with
#[derive(Debug, Clone)]
pub struct RowSegment {
    pub segment: GroundSegment,
    pub x: f32,
    /// Top edge of the segment
    pub height: f32,
    pub width: f32,
    pub right_edge: f32,
}

#[derive(Debug, Clone)]
struct RowState {
    band: RowBand,
    height: f32,
    segments: Vec<RowSegment>,
}

impl RowState {
    fn new(band: RowBand) -> Self {
        Self {
            band,
            height: band.base,
            segments: Vec::new(),
        }
    }
}

/// Seeded generator that emits terrain ahead of the player and retires it behind
#[derive(Debug, Clone)]
pub struct GroundGenerator {
    settings: TerrainSettings,
    rng: Pcg32,
    bottom: RowState,
    top: RowState,
    last_platform_end: f32,
}

impl GroundGenerator {
    pub fn new(settings: &TerrainSettings, seed: u64) -> Self {
        Self {
            settings: settings.clone(),
            rng: Pcg32::seed_from_u64(seed),
            bottom: RowState::new(settings.bottom),
            top: RowState::new(settings.top),
            last_platform_end: 0.0,
        }
    }

    /// Right edge of the most recently generated pair
    pub fn last_platform_end(&self) -> f32 {
        self.last_platform_end
    }

    pub fn row(&self, row: Row) -> &[RowSegment] {
        match row {
            Row::Bottom => &self.bottom.segments,
            Row::Top => &self.top.segments,
        }
    }

    /// All live segments, bottom row first
    pub fn segments(&self) -> impl Iterator<Item = &RowSegment> + '_ {
        self.bottom.segments.iter().chain(self.top.segments.iter())
    }

    pub fn segment_count(&self) -> usize {
        self.bottom.segments.len() + self.top.segments.len()
    }

    /// Place the opening pair at x = 0 and `count - 1` generated pairs after it
    pub fn generate_initial_platforms(
        &mut self,
        physics: &mut PhysicsEngine,
        count: usize,
    ) -> SimResult<()> {
        if count == 0 {
            return Ok(());
        }
        let width = self.settings.initial_width;
        self.bottom.height = self.bottom.band.base;
        self.top.height = self.top.band.base;
        self.place_pair(physics, 0.0, width)?;
        self.last_platform_end = width;

        for _ in 1..count {
            self.generate_next_platforms(physics)?;
        }
        log::debug!(
            "Initial terrain: {} segments up to x={:.0}",
            self.segment_count(),
            self.last_platform_end
        );
        Ok(())
    }

    /// Append one pair after a random gap
    pub fn generate_next_platforms(&mut self, physics: &mut PhysicsEngine) -> SimResult<()> {
        let t = &self.settings;
        let gap = self.rng.random_range(t.min_gap..=t.max_gap);
        let width = self.rng.random_range(t.min_width..=t.max_width);
        let variation = t.height_variation;

        for row in [&mut self.bottom, &mut self.top] {
            let delta = self.rng.random_range(-variation..=variation);
            row.height = row.band.clamp(row.height + delta);
        }

        let x = self.last_platform_end + gap;
        self.place_pair(physics, x, width)?;
        self.last_platform_end = x + width;
        Ok(())
    }

    fn place_pair(&mut self, physics: &mut PhysicsEngine, x: f32, width: f32) -> SimResult<()> {
        let thickness = self.settings.thickness;
        for row in [&mut self.bottom, &mut self.top] {
            let segment = GroundSegment::spawn(physics, x, row.height, width, thickness)?;
            row.segments.push(RowSegment {
                segment,
                x,
                height: row.height,
                width,
                right_edge: x + width,
            });
        }
        Ok(())
    }

    /// Generate ahead of `player_x` and retire segments left behind
    pub fn update(
        &mut self,
        physics: &mut PhysicsEngine,
        player_x: f32,
        view_distance: f32,
    ) -> SimResult<()> {
        let horizon = player_x + view_distance;
        let mut generated = 0;
        while self.last_platform_end < horizon {
            self.generate_next_platforms(physics)?;
            generated += 1;
        }

        let cutoff = player_x - view_distance;
        let mut retired = 0;
        for row in [&mut self.bottom, &mut self.top] {
            // Rows are ordered by x, so retired segments form a prefix
            let split = row
                .segments
                .iter()
                .position(|s| s.right_edge > cutoff)
                .unwrap_or(row.segments.len());
            for old in row.segments.drain(..split) {
                physics.remove_body(old.segment.object().handle())?;
                retired += 1;
            }
        }

        if generated > 0 || retired > 0 {
            log::debug!(
                "Terrain streamed: +{} pairs, -{} segments, end x={:.0}",
                generated,
                retired,
                self.last_platform_end
            );
        }
        Ok(())
    }

    /// Release every segment and reset the walk
    pub fn clear(&mut self, physics: &mut PhysicsEngine) {
        for row in [&mut self.bottom, &mut self.top] {
            for old in row.segments.drain(..) {
                // Bodies may already be gone after a physics clear
                if let Err(err) = physics.remove_body(old.segment.object().handle()) {
                    log::debug!("Segment already released: {}", err);
                }
            }
            row.height = row.band.base;
        }
        self.last_platform_end = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PhysicsSettings;
    use proptest::prelude::*;

    fn setup(seed: u64) -> (PhysicsEngine, GroundGenerator) {
        let physics = PhysicsEngine::new(&PhysicsSettings::default());
        let generator = GroundGenerator::new(&TerrainSettings::default(), seed);
        (physics, generator)
    }

    #[test]
    fn test_initial_pair_at_origin() {
        let (mut physics, mut generator) = setup(7);
        generator.generate_initial_platforms(&mut physics, 1).unwrap();

        assert_eq!(generator.last_platform_end(), 300.0);
        let bottom = &generator.row(Row::Bottom)[0];
        let top = &generator.row(Row::Top)[0];
        assert_eq!((bottom.x, bottom.height, bottom.width), (0.0, 500.0, 300.0));
        assert_eq!((top.x, top.height, top.width), (0.0, 100.0, 300.0));
        assert_eq!(physics.body_count(), 2);
    }

    #[test]
    fn test_initial_platform_count() {
        let (mut physics, mut generator) = setup(7);
        generator.generate_initial_platforms(&mut physics, 5).unwrap();
        assert_eq!(generator.row(Row::Bottom).len(), 5);
        assert_eq!(generator.row(Row::Top).len(), 5);
        assert_eq!(physics.body_count(), 10);
    }

    #[test]
    fn test_streaming_window() {
        let (mut physics, mut generator) = setup(42);
        generator.generate_initial_platforms(&mut physics, 1).unwrap();
        assert_eq!(generator.last_platform_end(), 300.0);

        generator.update(&mut physics, 5000.0, 1000.0).unwrap();

        assert!(generator.segments().all(|s| s.right_edge >= 4000.0));
        assert!(generator.segments().any(|s| s.right_edge >= 6000.0));
        // Retired segments released their bodies
        assert_eq!(physics.body_count(), generator.segment_count());
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let (mut physics_a, mut a) = setup(99);
        let (mut physics_b, mut b) = setup(99);
        a.generate_initial_platforms(&mut physics_a, 20).unwrap();
        b.generate_initial_platforms(&mut physics_b, 20).unwrap();

        let geometry = |g: &GroundGenerator| -> Vec<(f32, f32, f32)> {
            g.segments().map(|s| (s.x, s.height, s.width)).collect()
        };
        assert_eq!(geometry(&a), geometry(&b));
    }

    #[test]
    fn test_clear_releases_bodies() {
        let (mut physics, mut generator) = setup(3);
        generator.generate_initial_platforms(&mut physics, 5).unwrap();
        generator.clear(&mut physics);

        assert_eq!(generator.segment_count(), 0);
        assert_eq!(generator.last_platform_end(), 0.0);
        assert_eq!(physics.body_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_rows_respect_constraints(seed in any::<u64>(), count in 2usize..40) {
            let settings = TerrainSettings::default();
            let (mut physics, mut generator) = setup(seed);
            generator.generate_initial_platforms(&mut physics, count).unwrap();

            for (row, band) in [(Row::Bottom, settings.bottom), (Row::Top, settings.top)] {
                let segments = generator.row(row);
                prop_assert_eq!(segments.len(), count);
                for pair in segments.windows(2) {
                    let (prev, next) = (&pair[0], &pair[1]);
                    let gap = next.x - prev.right_edge;
                    prop_assert!(
                        gap >= settings.min_gap - 0.01 && gap <= settings.max_gap + 0.01
                    );
                    prop_assert!(
                        next.width >= settings.min_width && next.width <= settings.max_width
                    );
                    prop_assert!(
                        (next.height - prev.height).abs() <= settings.height_variation + 1e-3
                    );
                    prop_assert!(next.height >= band.min && next.height <= band.max);
                }
            }

            // Rows share their horizontal layout
            let bottom = generator.row(Row::Bottom);
            let top = generator.row(Row::Top);
            for (b, t) in bottom.iter().zip(top) {
                prop_assert_eq!(b.x, t.x);
                prop_assert_eq!(b.width, t.width);
            }
        }
    }
}
