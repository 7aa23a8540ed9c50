//! Distance scoring
//!
//! Points are earned only for new ground: the furthest x reached so far acts as
//! a marker, and moving back never costs points.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTracker {
    furthest_right: Option<f32>,
    score: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.furthest_right = None;
        self.score = 0;
    }

    /// Set the marker without scoring
    pub fn initialize_position(&mut self, x: f32) {
        self.furthest_right = Some(x);
    }

    /// Advance the marker if `x` passes it. Returns the points earned.
    pub fn update_score(&mut self, x: f32) -> u64 {
        match self.furthest_right {
            None => {
                self.furthest_right = Some(x);
                0
            }
            Some(furthest) if x > furthest => {
                let points = (x - furthest).floor() as u64;
                self.score += points;
                self.furthest_right = Some(x);
                points
            }
            Some(_) => 0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn furthest_right(&self) -> Option<f32> {
        self.furthest_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_backtracking_earns_nothing() {
        let mut tracker = ScoreTracker::new();
        tracker.initialize_position(0.0);
        let earned: Vec<u64> = [50.0, 30.0, 80.0]
            .into_iter()
            .map(|x| tracker.update_score(x))
            .collect();

        // The dip to 30 earns nothing and leaves the marker at 50
        assert_eq!(earned, vec![50, 0, 30]);
        assert_eq!(tracker.score(), 80);
        assert_eq!(tracker.furthest_right(), Some(80.0));
    }

    #[test]
    fn test_first_sample_sets_marker() {
        let mut tracker = ScoreTracker::new();
        assert_eq!(tracker.update_score(200.0), 0);
        assert_eq!(tracker.update_score(210.7), 10);
        assert_eq!(tracker.score(), 10);

        tracker.reset();
        assert_eq!(tracker.score(), 0);
        assert_eq!(tracker.furthest_right(), None);
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(xs in prop::collection::vec(-1000.0f32..10_000.0, 1..100)) {
            let mut tracker = ScoreTracker::new();
            let mut previous = 0;
            for x in xs {
                tracker.update_score(x);
                prop_assert!(tracker.score() >= previous);
                previous = tracker.score();
            }
        }
    }
}
