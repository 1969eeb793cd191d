//! Distance sample conditioning
//!
//! Turns raw ultrasonic readings into a low-latency smoothed distance.
//!
//! ## Policy
//!
//! ```text
//! sample is NoEcho, non-finite or <= noise floor
//!     -> hold: return the previous filtered value (0.0 if none yet)
//! first valid sample
//!     -> filtered = raw
//! otherwise
//!     -> filtered = (1 - alpha) * filtered + alpha * raw
//! ```
//!
//! A held sample never moves the filter state, so a run of timeouts keeps
//! reporting the last good estimate and the next real echo resumes from it.

use crate::constants::ranging::{
    ECHO_TIMEOUT_US, FILTER_ALPHA, MIN_VALID_DISTANCE_CM, SOUND_CM_PER_US,
};

/// One ranging result, produced every control cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DistanceSample {
    /// Echo returned; distance in centimeters
    Echo(f32),
    /// Echo timed out
    NoEcho,
}

impl DistanceSample {
    /// Convert an echo pulse width to a sample
    ///
    /// A zero width is what the pulse timer reports on timeout; anything at
    /// or past [`ECHO_TIMEOUT_US`] is treated the same way.
    pub fn from_echo_us(duration_us: u32) -> Self {
        if duration_us == 0 || duration_us >= ECHO_TIMEOUT_US {
            return Self::NoEcho;
        }
        Self::Echo(duration_us as f32 * SOUND_CM_PER_US / 2.0)
    }

    /// The distance, if this sample is usable above `noise_floor`
    pub fn valid_cm(&self, noise_floor: f32) -> Option<f32> {
        match *self {
            Self::Echo(cm) if cm.is_finite() && cm > noise_floor => Some(cm),
            _ => None,
        }
    }
}

/// Result of feeding one sample through the filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filtered {
    /// The sample as used this cycle: the raw distance, or the held value
    pub used_cm: f32,
    /// Smoothed distance after this cycle
    pub filtered_cm: f32,
    /// True when the raw sample was rejected and the previous value held
    pub held: bool,
}

/// One-pole exponential filter with hold-last on missed echoes
#[derive(Debug, Clone)]
pub struct DistanceFilter {
    alpha: f32,
    noise_floor: f32,
    filtered: Option<f32>,
}

impl Default for DistanceFilter {
    fn default() -> Self {
        Self::new(FILTER_ALPHA, MIN_VALID_DISTANCE_CM)
    }
}

impl DistanceFilter {
    /// Create a filter; `alpha` is the weight of the newest sample
    pub fn new(alpha: f32, noise_floor: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            noise_floor,
            filtered: None,
        }
    }

    /// Current estimate, `None` until the first valid echo
    pub fn current(&self) -> Option<f32> {
        self.filtered
    }

    /// Feed one sample and return the smoothed distance
    pub fn filter(&mut self, sample: DistanceSample) -> f32 {
        self.update(sample).filtered_cm
    }

    /// Feed one sample and report what was used
    pub fn update(&mut self, sample: DistanceSample) -> Filtered {
        let Some(raw) = sample.valid_cm(self.noise_floor) else {
            let held = self.filtered.unwrap_or(0.0);
            return Filtered { used_cm: held, filtered_cm: held, held: true };
        };

        let next = match self.filtered {
            None => raw,
            Some(prev) => (1.0 - self.alpha) * prev + self.alpha * raw,
        };
        self.filtered = Some(next);

        Filtered { used_cm: raw, filtered_cm: next, held: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_width_converts_to_centimeters() {
        // 1166 µs round trip is about 20 cm
        match DistanceSample::from_echo_us(1166) {
            DistanceSample::Echo(cm) => assert!((cm - 19.997).abs() < 0.01),
            other => panic!("expected echo, got {:?}", other),
        }
        assert_eq!(DistanceSample::from_echo_us(0), DistanceSample::NoEcho);
    }

    #[test]
    fn echo_past_timeout_is_no_echo() {
        assert_eq!(DistanceSample::from_echo_us(ECHO_TIMEOUT_US), DistanceSample::NoEcho);
        assert_eq!(DistanceSample::from_echo_us(u32::MAX), DistanceSample::NoEcho);
        assert!(matches!(
            DistanceSample::from_echo_us(ECHO_TIMEOUT_US - 1),
            DistanceSample::Echo(cm) if cm > 500.0
        ));
    }

    #[test]
    fn first_valid_sample_initializes() {
        let mut filter = DistanceFilter::default();
        assert_eq!(filter.current(), None);
        assert_eq!(filter.filter(DistanceSample::Echo(20.0)), 20.0);
    }

    #[test]
    fn tracks_quickly() {
        let mut filter = DistanceFilter::default();
        filter.filter(DistanceSample::Echo(20.0));

        // 0.15 * 20 + 0.85 * 10 = 11.5
        let out = filter.filter(DistanceSample::Echo(10.0));
        assert!((out - 11.5).abs() < 1e-4);
    }

    #[test]
    fn timeout_holds_last_value() {
        let mut filter = DistanceFilter::default();
        filter.filter(DistanceSample::Echo(20.0));
        filter.filter(DistanceSample::Echo(18.0));
        let before = filter.current().unwrap();

        let step = filter.update(DistanceSample::NoEcho);
        assert!(step.held);
        assert_eq!(step.filtered_cm, before);
        assert_eq!(step.used_cm, before);
        assert_eq!(filter.current(), Some(before));
    }

    #[test]
    fn noise_floor_and_garbage_are_rejected() {
        let mut filter = DistanceFilter::default();
        filter.filter(DistanceSample::Echo(15.0));

        assert_eq!(filter.filter(DistanceSample::Echo(0.1)), 15.0);
        assert_eq!(filter.filter(DistanceSample::Echo(0.0)), 15.0);
        assert_eq!(filter.filter(DistanceSample::Echo(f32::NAN)), 15.0);
        assert_eq!(filter.filter(DistanceSample::Echo(-4.0)), 15.0);
    }

    #[test]
    fn miss_before_any_echo_reads_zero() {
        let mut filter = DistanceFilter::default();
        assert_eq!(filter.filter(DistanceSample::NoEcho), 0.0);
        // Held zero does not seed the filter
        assert_eq!(filter.current(), None);
        assert_eq!(filter.filter(DistanceSample::Echo(12.0)), 12.0);
    }
}
