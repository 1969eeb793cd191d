//! Baseline (zero-point) calibration
//!
//! For a fixed window after power-on the controller averages the filtered
//! distance to learn what "flat road" looks like from where the sensor is
//! mounted. Hazard height is later measured against that reference.
//!
//! ```text
//! CALIBRATING --(elapsed >= window)--> READY   (terminal)
//! ```
//!
//! The window starts on the first sample, not at construction, so time
//! spent connecting before the loop runs does not eat into it. The sample
//! that closes the window is included in the mean.

use crate::constants::ranging::{CALIBRATION_WINDOW_MS, MIN_VALID_DISTANCE_CM};
use crate::time::{elapsed_ms, Timestamp};

/// Learned reference distance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Baseline {
    /// Mean filtered distance over the window (cm)
    pub distance_cm: f32,
    /// Samples that went into the mean
    pub samples: u32,
}

impl Baseline {
    /// True when the window produced no usable reference
    ///
    /// Happens when no echo came back for the whole window, so every
    /// accumulated sample was the held zero.
    pub fn is_degraded(&self) -> bool {
        self.samples == 0 || self.distance_cm <= MIN_VALID_DISTANCE_CM
    }
}

/// Calibrator state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationState {
    /// Accumulating samples
    Calibrating {
        /// Time of the first sample, once seen
        started_at: Option<Timestamp>,
        /// Running sum of filtered distance
        sum_cm: f32,
        /// Samples accumulated so far
        count: u32,
    },
    /// Baseline fixed for the rest of the session
    Ready(Baseline),
}

/// What one calibration step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStatus {
    /// Still inside the window
    Pending {
        /// Milliseconds elapsed since the first sample
        elapsed_ms: u64,
    },
    /// This sample closed the window
    JustReady(Baseline),
    /// Window closed on an earlier cycle
    Ready(Baseline),
}

/// Learns the baseline once per session
#[derive(Debug, Clone)]
pub struct BaselineCalibrator {
    window_ms: u64,
    state: CalibrationState,
}

impl Default for BaselineCalibrator {
    fn default() -> Self {
        Self::new(CALIBRATION_WINDOW_MS)
    }
}

impl BaselineCalibrator {
    /// Create a calibrator with the given learning window
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            state: CalibrationState::Calibrating {
                started_at: None,
                sum_cm: 0.0,
                count: 0,
            },
        }
    }

    /// Current state
    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// The baseline, once ready
    pub fn baseline(&self) -> Option<Baseline> {
        match self.state {
            CalibrationState::Ready(baseline) => Some(baseline),
            CalibrationState::Calibrating { .. } => None,
        }
    }

    /// True once the window has closed
    pub fn is_ready(&self) -> bool {
        matches!(self.state, CalibrationState::Ready(_))
    }

    /// Account for one filtered sample taken at `now`
    ///
    /// Once ready, further samples are ignored and the stored baseline is
    /// returned unchanged.
    pub fn update(&mut self, filtered_cm: f32, now: Timestamp) -> CalibrationStatus {
        let (started_at, sum_cm, count) = match &mut self.state {
            CalibrationState::Ready(baseline) => return CalibrationStatus::Ready(*baseline),
            CalibrationState::Calibrating { started_at, sum_cm, count } => (started_at, sum_cm, count),
        };

        let start = *started_at.get_or_insert(now);
        *sum_cm += filtered_cm;
        *count = count.saturating_add(1);

        let elapsed = elapsed_ms(start, now);
        if elapsed < self.window_ms {
            return CalibrationStatus::Pending { elapsed_ms: elapsed };
        }

        let baseline = Baseline {
            distance_cm: *sum_cm / (*count).max(1) as f32,
            samples: *count,
        };
        self.state = CalibrationState::Ready(baseline);
        CalibrationStatus::JustReady(baseline)
    }
}
