//! Hazard severity and the speed table
//!
//! The sensor side of the controller: how far the road surface has risen
//! toward the sensor relative to the calibrated baseline, bucketed into a
//! severity, and the PWM duty the vehicle drives at for that severity.
//!
//! ```text
//! height change (cm)   severity   duty
//! [0.0, 0.5)           0          170
//! [0.5, 1.5)           1          140
//! [1.5, 3.0)           2          110
//! [3.0, inf)           3           70
//! ```

use core::fmt;

use crate::calibration::Baseline;
use crate::constants::control::{
    MAX_DUTY, RAISE_MINOR_CM, RAISE_MODERATE_CM, RAISE_SEVERE_CM,
    SPEED_FAST, SPEED_MINOR, SPEED_MODERATE, SPEED_SEVERE,
};

/// Discrete hazard level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Severity {
    /// Flat road
    None = 0,
    /// Small bump or dip
    Minor = 1,
    /// Noticeable hazard
    Moderate = 2,
    /// Large hazard
    Severe = 3,
}

impl Severity {
    /// All levels, mildest first
    pub const ALL: [Severity; 4] = [Self::None, Self::Minor, Self::Moderate, Self::Severe];

    /// Numeric level in `0..=3`
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// Level back to a severity, `None` outside `0..=3`
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 => Some(Self::Minor),
            2 => Some(Self::Moderate),
            3 => Some(Self::Severe),
            _ => None,
        }
    }

    /// True for anything above flat road
    pub const fn is_hazard(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// PWM duty sent to the motor driver
///
/// Always inside `0..=MAX_DUTY`; anything else is clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedCommand(u8);

impl SpeedCommand {
    /// Stopped
    pub const STOP: Self = Self(0);

    /// Wrap a duty value
    pub const fn new(duty: u8) -> Self {
        Self(duty)
    }

    /// Clamp an arbitrary integer into the duty range
    pub fn clamped(duty: i32) -> Self {
        Self(duty.clamp(0, MAX_DUTY as i32) as u8)
    }

    /// Raw duty value
    pub const fn duty(self) -> u8 {
        self.0
    }
}

impl fmt::Display for SpeedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity and speed decided for one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    /// How far the surface rose above baseline (cm, never negative)
    pub height_change_cm: f32,
    /// Sensor-derived severity
    pub severity: Severity,
    /// Speed to drive at
    pub speed: SpeedCommand,
}

/// Bucket a height change into a severity
pub fn severity_from_raise(height_change_cm: f32) -> Severity {
    if height_change_cm < RAISE_MINOR_CM {
        Severity::None
    } else if height_change_cm < RAISE_MODERATE_CM {
        Severity::Minor
    } else if height_change_cm < RAISE_SEVERE_CM {
        Severity::Moderate
    } else {
        Severity::Severe
    }
}

/// Speed for a numeric severity level
///
/// Levels outside `0..=3` fall back to the fast speed.
pub fn speed_for_level(level: u8) -> SpeedCommand {
    let duty = match level {
        0 => SPEED_FAST,
        1 => SPEED_MINOR,
        2 => SPEED_MODERATE,
        3 => SPEED_SEVERE,
        _ => SPEED_FAST,
    };
    SpeedCommand::new(duty)
}

/// Speed for a severity
pub fn speed_for(severity: Severity) -> SpeedCommand {
    speed_for_level(severity.level())
}

/// Maps filtered distance to severity and speed against a fixed baseline
#[derive(Debug, Clone, Copy)]
pub struct SensorSeverityMapper {
    baseline_cm: f32,
}

impl SensorSeverityMapper {
    /// Create a mapper for a calibrated baseline
    pub fn new(baseline: Baseline) -> Self {
        Self::with_baseline_cm(baseline.distance_cm)
    }

    /// Create a mapper from a raw reference distance
    pub fn with_baseline_cm(baseline_cm: f32) -> Self {
        Self { baseline_cm }
    }

    /// Reference distance in use
    pub fn baseline_cm(&self) -> f32 {
        self.baseline_cm
    }

    /// Rise of the surface toward the sensor; dips count as zero
    pub fn height_change(&self, filtered_cm: f32) -> f32 {
        // f32::max ignores a NaN operand
        (self.baseline_cm - filtered_cm).max(0.0)
    }

    /// Decide severity and speed for one filtered distance
    pub fn assess(&self, filtered_cm: f32) -> Assessment {
        let height_change_cm = self.height_change(filtered_cm);
        let severity = severity_from_raise(height_change_cm);
        Assessment {
            height_change_cm,
            severity,
            speed: speed_for(severity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundaries_are_exclusive() {
        assert_eq!(severity_from_raise(0.0), Severity::None);
        assert_eq!(severity_from_raise(0.49), Severity::None);
        assert_eq!(severity_from_raise(0.5), Severity::Minor);
        assert_eq!(severity_from_raise(1.49), Severity::Minor);
        assert_eq!(severity_from_raise(1.5), Severity::Moderate);
        assert_eq!(severity_from_raise(2.99), Severity::Moderate);
        assert_eq!(severity_from_raise(3.0), Severity::Severe);
        assert_eq!(severity_from_raise(40.0), Severity::Severe);
    }

    #[test]
    fn speed_table() {
        assert_eq!(speed_for(Severity::None).duty(), 170);
        assert_eq!(speed_for(Severity::Minor).duty(), 140);
        assert_eq!(speed_for(Severity::Moderate).duty(), 110);
        assert_eq!(speed_for(Severity::Severe).duty(), 70);

        // Unknown levels fall back to full pace
        assert_eq!(speed_for_level(4).duty(), 170);
        assert_eq!(speed_for_level(u8::MAX).duty(), 170);
    }

    #[test]
    fn speed_falls_as_severity_rises() {
        for pair in Severity::ALL.windows(2) {
            assert!(speed_for(pair[1]) < speed_for(pair[0]));
        }
    }

    #[test]
    fn two_centimeter_rise_is_moderate() {
        let mapper = SensorSeverityMapper::with_baseline_cm(20.0);
        let assessment = mapper.assess(18.0);
        assert!((assessment.height_change_cm - 2.0).abs() < 1e-5);
        assert_eq!(assessment.severity, Severity::Moderate);
        assert_eq!(assessment.speed, SpeedCommand::new(110));
    }

    #[test]
    fn dips_are_not_hazards() {
        let mapper = SensorSeverityMapper::with_baseline_cm(20.0);
        assert_eq!(mapper.height_change(25.0), 0.0);
        assert_eq!(mapper.assess(25.0).severity, Severity::None);
        assert_eq!(mapper.assess(f32::NAN).severity, Severity::None);
    }

    #[test]
    fn speed_command_clamps() {
        assert_eq!(SpeedCommand::clamped(-20).duty(), 0);
        assert_eq!(SpeedCommand::clamped(300).duty(), 255);
        assert_eq!(SpeedCommand::clamped(140).duty(), 140);
    }

    #[test]
    fn level_round_trip_is_total_on_known_levels() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_level(severity.level()), Some(severity));
        }
        assert_eq!(Severity::from_level(4), None);
    }
}
