//! Speed-Derived Reporting
//!
//! ## Overview
//!
//! The controller reports on how the vehicle is actually behaving, not on
//! what the sensor saw. Both reported quantities are computed from the
//! commanded speed only:
//!
//! - **Reported severity**: how far the commanded duty falls below the fast
//!   reference, bucketed into `0..=3`. Stateless.
//! - **Road score**: a `[0, 100]` health figure that chases
//!   `100 × speed / fast` with asymmetric exponential smoothing. It drops
//!   at `k_down` and recovers at the slower `k_up`, so a run of slow-downs
//!   costs more than the same run of speed-ups earns back.
//!
//! ```text
//! raw distance ──► filter ──► mapper ──► SpeedCommand ──► actuator
//!                                              │
//!                                              ▼
//!                                     ReportedEstimator ──► ChangeGate
//! ```
//!
//! Keeping the reporting channel downstream of the speed decision means a
//! noisy echo that never changed the speed never reaches the dashboard, and
//! the score climbs back smoothly once the vehicle speeds up again.
//!
//! ## Example
//!
//! ```rust
//! use roadguard_core::estimator::ReportedEstimator;
//! use roadguard_core::severity::{Severity, SpeedCommand};
//!
//! let mut estimator = ReportedEstimator::default();
//! let reported = estimator.observe(SpeedCommand::new(110));
//!
//! assert_eq!(reported.severity, Severity::Moderate);
//! assert_eq!(reported.road_score, 88);
//! ```

mod reported;
mod road_score;

pub use reported::reported_severity;
pub use road_score::RoadScore;

use crate::constants::control::SPEED_FAST;
use crate::severity::{Severity, SpeedCommand};

/// Reported state for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reported {
    /// Severity derived from the speed shortfall
    pub severity: Severity,
    /// Road score rounded half-up to an integer
    pub road_score: u8,
}

/// Owns the road score and derives both reported values from speed
#[derive(Debug, Clone)]
pub struct ReportedEstimator {
    fast_reference: SpeedCommand,
    score: RoadScore,
}

impl Default for ReportedEstimator {
    fn default() -> Self {
        Self::new(SpeedCommand::new(SPEED_FAST), RoadScore::default())
    }
}

impl ReportedEstimator {
    /// Create an estimator around a fast reference speed and a score model
    pub fn new(fast_reference: SpeedCommand, score: RoadScore) -> Self {
        Self { fast_reference, score }
    }

    /// Fold one commanded speed into the reported state
    pub fn observe(&mut self, speed: SpeedCommand) -> Reported {
        Reported {
            severity: reported_severity(speed, self.fast_reference),
            road_score: self.score.update(speed),
        }
    }

    /// The road score model
    pub fn score(&self) -> &RoadScore {
        &self.score
    }
}
