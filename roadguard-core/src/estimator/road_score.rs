//! Continuous road score with asymmetric smoothing
//!
//! ```text
//! norm   = clamp(speed / fast, 0, 1)
//! target = 100 * norm
//! k      = k_up   if target > score      (recovering)
//!          k_down otherwise              (dropping or holding)
//! score  = clamp((1 - k) * score + k * target, 0, 100)
//! ```
//!
//! Starts at 100 on power-on and is never reset afterwards.

use crate::constants::control::{K_DOWN, K_UP, ROAD_SCORE_MAX, ROAD_SCORE_MIN, SPEED_FAST};
use crate::severity::SpeedCommand;

/// Smoothed `[0, 100]` road health figure
#[derive(Debug, Clone)]
pub struct RoadScore {
    score: f32,
    fast_reference: f32,
    k_up: f32,
    k_down: f32,
}

impl Default for RoadScore {
    fn default() -> Self {
        Self::new(SpeedCommand::new(SPEED_FAST), K_UP, K_DOWN)
    }
}

impl RoadScore {
    /// Create a score at full health
    ///
    /// Blend rates are clamped into `[0, 1]`.
    pub fn new(fast_reference: SpeedCommand, k_up: f32, k_down: f32) -> Self {
        Self {
            score: ROAD_SCORE_MAX,
            fast_reference: fast_reference.duty() as f32,
            k_up: k_up.clamp(0.0, 1.0),
            k_down: k_down.clamp(0.0, 1.0),
        }
    }

    /// Unrounded score
    pub fn value(&self) -> f32 {
        self.score
    }

    /// Score rounded half-up
    pub fn rounded(&self) -> u8 {
        round_half_up(self.score)
    }

    /// Score the vehicle converges to when held at `speed`
    pub fn target_for(&self, speed: SpeedCommand) -> f32 {
        let norm = if self.fast_reference > 0.0 {
            (speed.duty() as f32 / self.fast_reference).clamp(0.0, 1.0)
        } else {
            1.0
        };
        ROAD_SCORE_MAX * norm
    }

    /// Step the score toward the target for `speed` and return it rounded
    pub fn update(&mut self, speed: SpeedCommand) -> u8 {
        let target = self.target_for(speed);
        let k = if target > self.score { self.k_up } else { self.k_down };

        self.score = ((1.0 - k) * self.score + k * target).clamp(ROAD_SCORE_MIN, ROAD_SCORE_MAX);
        self.rounded()
    }
}

/// Round a score in `[0, 100]` half-up to an integer
fn round_half_up(score: f32) -> u8 {
    libm::floorf(score.clamp(ROAD_SCORE_MIN, ROAD_SCORE_MAX) + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(score: &mut RoadScore, duty: u8, cycles: usize) -> f32 {
        for _ in 0..cycles {
            score.update(SpeedCommand::new(duty));
        }
        score.value()
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(87.5), 88);
        assert_eq!(round_half_up(87.49), 87);
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(100.0), 100);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn first_drop_uses_k_down() {
        let mut score = RoadScore::default();
        // 0.65 * 100 + 0.35 * 64.705
        assert_eq!(score.update(SpeedCommand::new(110)), 88);
        assert!((score.value() - 87.647).abs() < 0.01);
    }

    #[test]
    fn drops_faster_than_it_recovers() {
        let mut score = RoadScore::default();
        let n = 5;

        let floor = held(&mut score, 70, n);
        let recovered = held(&mut score, 170, n);
        let target_low = 100.0 * 70.0 / 170.0;

        let drop_progress = (100.0 - floor) / (100.0 - target_low);
        let recover_progress = (recovered - floor) / (100.0 - floor);

        assert!(recovered < 100.0);
        assert!(drop_progress > recover_progress);
        // Closed forms: 1 - 0.65^5 and 1 - 0.8^5
        assert!((drop_progress - 0.8840).abs() < 1e-3);
        assert!((recover_progress - 0.6723).abs() < 1e-3);
    }

    #[test]
    fn stopped_vehicle_decays_toward_zero() {
        let mut score = RoadScore::default();
        let value = held(&mut score, 0, 60);
        assert!(value >= 0.0);
        assert!(value < 0.01);
        assert_eq!(score.rounded(), 0);
    }

    #[test]
    fn overspeed_targets_full_score() {
        let score = RoadScore::default();
        assert_eq!(score.target_for(SpeedCommand::new(255)), 100.0);
        assert_eq!(score.target_for(SpeedCommand::STOP), 0.0);
    }

    #[test]
    fn zero_reference_counts_as_full_pace() {
        let mut score = RoadScore::new(SpeedCommand::STOP, K_UP, K_DOWN);
        assert_eq!(score.update(SpeedCommand::new(50)), 100);
    }
}
