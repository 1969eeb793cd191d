//! Telemetry records and the serial monitor line
//!
//! A `TelemetryRecord` is the four-field sample the dashboard ingests:
//!
//! ```json
//! {"distance": 19.42, "speed": 110, "severity": 2, "roadScore": 88}
//! ```
//!
//! While the baseline is being learned the controller reports severity `-1`
//! and a full score, so a consumer can tell "not evaluated yet" apart from
//! "evaluated, healthy".

use core::fmt::Write;

use heapless::String;

use crate::constants::control::{CALIBRATING_SEVERITY, ROAD_SCORE_MAX};
use crate::estimator::Reported;
use crate::severity::{Severity, SpeedCommand};

/// Capacity of a rendered monitor line
pub const MONITOR_LINE_CAPACITY: usize = 64;

/// `distance,speed,severity,roadScore` as printed on the serial console
pub type MonitorLine = String<MONITOR_LINE_CAPACITY>;

/// One telemetry sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    /// Distance used this cycle (cm)
    pub distance: f32,
    /// Commanded PWM duty
    pub speed: u8,
    /// Reported severity, or `-1` while calibrating
    pub severity: i8,
    /// Rounded road score
    pub road_score: u8,
}

impl TelemetryRecord {
    /// Record for a cycle with a reported state
    pub fn reported(distance: f32, speed: SpeedCommand, reported: Reported) -> Self {
        Self {
            distance,
            speed: speed.duty(),
            severity: reported.severity.level() as i8,
            road_score: reported.road_score,
        }
    }

    /// Record for a cycle inside the calibration window
    pub fn calibrating(distance: f32, speed: SpeedCommand) -> Self {
        Self {
            distance,
            speed: speed.duty(),
            severity: CALIBRATING_SEVERITY,
            road_score: ROAD_SCORE_MAX as u8,
        }
    }

    /// True for records emitted before the baseline was ready
    pub fn is_calibrating(&self) -> bool {
        self.severity == CALIBRATING_SEVERITY
    }

    /// Render the serial monitor CSV line
    ///
    /// Values too long for the line are truncated rather than failing.
    pub fn monitor_line(&self) -> MonitorLine {
        let mut line = MonitorLine::new();
        let _ = write!(
            line,
            "{:.2},{},{},{}",
            self.distance, self.speed, self.severity, self.road_score
        );
        line
    }
}

/// Counts hazard onsets in the reported stream
///
/// An onset is a reported severity above zero directly after a zero, the
/// same rule the dashboard uses to count potholes.
#[derive(Debug, Clone)]
pub struct HazardTally {
    last: Severity,
    onsets: u32,
}

impl Default for HazardTally {
    fn default() -> Self {
        Self { last: Severity::None, onsets: 0 }
    }
}

impl HazardTally {
    /// Feed one emitted severity; returns true on an onset
    pub fn observe(&mut self, severity: Severity) -> bool {
        let onset = severity.is_hazard() && !self.last.is_hazard();
        if onset {
            self.onsets = self.onsets.saturating_add(1);
        }
        self.last = severity;
        onset
    }

    /// Onsets seen so far
    pub fn onsets(&self) -> u32 {
        self.onsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_record_uses_sentinel() {
        let record = TelemetryRecord::calibrating(20.0, SpeedCommand::new(110));
        assert_eq!(record.severity, -1);
        assert_eq!(record.road_score, 100);
        assert!(record.is_calibrating());
    }

    #[test]
    fn monitor_line_format() {
        let record = TelemetryRecord::reported(
            18.456,
            SpeedCommand::new(110),
            Reported { severity: Severity::Moderate, road_score: 88 },
        );
        assert_eq!(record.monitor_line().as_str(), "18.46,110,2,88");

        let calibrating = TelemetryRecord::calibrating(20.0, SpeedCommand::new(110));
        assert_eq!(calibrating.monitor_line().as_str(), "20.00,110,-1,100");
    }

    #[test]
    fn tally_counts_rising_edges_only() {
        let mut tally = HazardTally::default();
        let stream = [
            Severity::None,
            Severity::Minor,    // onset
            Severity::Moderate, // still in hazard
            Severity::None,
            Severity::Severe,   // onset
            Severity::Severe,
        ];
        let onsets: usize = stream.iter().filter(|s| tally.observe(**s)).count();
        assert_eq!(onsets, 2);
        assert_eq!(tally.onsets(), 2);
    }
}
