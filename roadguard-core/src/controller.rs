//! Control state machine
//!
//! `Controller` owns every piece of state the vehicle carries between
//! cycles: the filtered distance, the baseline, the road score, the last
//! emitted reported pair and the hazard tally. It does no I/O. Each call to
//! [`Controller::step`] takes one distance sample and a timestamp and
//! returns what the cycle decided; [`crate::control_loop::ControlLoop`]
//! applies that to the hardware.
//!
//! ```text
//! sample ─► filter ─┬─ CALIBRATING ─► accumulate, hold calibration speed
//!                   └─ READY ───────► map ─► speed ─► estimate ─► gate
//! ```
//!
//! The cycle that closes the calibration window still runs at calibration
//! speed; mapping starts on the next one.

use crate::calibration::{Baseline, BaselineCalibrator, CalibrationStatus};
use crate::config::ControllerConfig;
use crate::errors::ConfigResult;
use crate::estimator::{Reported, ReportedEstimator, RoadScore};
use crate::filter::{DistanceFilter, DistanceSample, Filtered};
use crate::gate::ChangeGate;
use crate::severity::{Assessment, SensorSeverityMapper, SpeedCommand};
use crate::telemetry::{HazardTally, TelemetryRecord};
use crate::time::Timestamp;

/// What one control cycle decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Baseline still being learned
    Calibrating {
        /// Filter output for this cycle
        sample: Filtered,
        /// Speed to hold
        speed: SpeedCommand,
        /// Set on the cycle that closed the window
        baseline: Option<Baseline>,
    },
    /// Baseline ready, sensor driving the speed
    Running {
        /// Filter output for this cycle
        sample: Filtered,
        /// Sensor severity and chosen speed
        assessment: Assessment,
        /// Speed-derived reported state
        reported: Reported,
        /// Record to send, present only when the reported state changed
        emission: Option<TelemetryRecord>,
        /// True if this emission starts a new hazard
        hazard_onset: bool,
    },
}

impl Step {
    /// Speed to apply this cycle
    pub fn speed(&self) -> SpeedCommand {
        match self {
            Step::Calibrating { speed, .. } => *speed,
            Step::Running { assessment, .. } => assessment.speed,
        }
    }

    /// Record for the serial monitor
    pub fn monitor_record(&self) -> TelemetryRecord {
        match self {
            Step::Calibrating { sample, speed, .. } => {
                TelemetryRecord::calibrating(sample.filtered_cm, *speed)
            }
            Step::Running { sample, assessment, reported, .. } => {
                TelemetryRecord::reported(sample.used_cm, assessment.speed, *reported)
            }
        }
    }
}

/// Single owner of all control state
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    filter: DistanceFilter,
    calibrator: BaselineCalibrator,
    mapper: Option<SensorSeverityMapper>,
    estimator: ReportedEstimator,
    gate: ChangeGate<Reported>,
    tally: HazardTally,
}

impl Default for Controller {
    fn default() -> Self {
        Self::build(ControllerConfig::default())
    }
}

impl Controller {
    /// Create a controller after validating `config`
    pub fn new(config: ControllerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ControllerConfig) -> Self {
        let fast = config.fast_command();
        Self {
            filter: DistanceFilter::new(config.filter_alpha, config.noise_floor_cm),
            calibrator: BaselineCalibrator::new(config.calibration_window_ms),
            mapper: None,
            estimator: ReportedEstimator::new(fast, RoadScore::new(fast, config.k_up, config.k_down)),
            gate: ChangeGate::new(),
            tally: HazardTally::default(),
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Learned baseline, once ready
    pub fn baseline(&self) -> Option<Baseline> {
        self.calibrator.baseline()
    }

    /// Current smoothed distance
    pub fn filtered_distance(&self) -> Option<f32> {
        self.filter.current()
    }

    /// Unrounded road score
    pub fn road_score(&self) -> f32 {
        self.estimator.score().value()
    }

    /// Last reported pair let through the gate
    pub fn last_emitted(&self) -> Option<Reported> {
        self.gate.last()
    }

    /// Hazard onsets among emitted records
    pub fn hazard_count(&self) -> u32 {
        self.tally.onsets()
    }

    /// Run one cycle on `sample` taken at `now`
    pub fn step(&mut self, sample: DistanceSample, now: Timestamp) -> Step {
        let filtered = self.filter.update(sample);

        let Some(mapper) = self.mapper else {
            return self.calibrate(filtered, now);
        };

        let assessment = mapper.assess(filtered.filtered_cm);
        let reported = self.estimator.observe(assessment.speed);

        let mut emission = None;
        let mut hazard_onset = false;
        if self.gate.observe(reported) {
            log_info!(
                "Severity changed to: {} | RoadScore: {}",
                reported.severity.level(),
                reported.road_score
            );
            hazard_onset = self.tally.observe(reported.severity);
            if hazard_onset {
                log_info!("hazard #{} detected", self.tally.onsets());
            }
            emission = Some(TelemetryRecord::reported(filtered.used_cm, assessment.speed, reported));
        }

        Step::Running { sample: filtered, assessment, reported, emission, hazard_onset }
    }

    fn calibrate(&mut self, filtered: Filtered, now: Timestamp) -> Step {
        let baseline = match self.calibrator.update(filtered.filtered_cm, now) {
            CalibrationStatus::JustReady(baseline) => {
                if baseline.is_degraded() {
                    log_warn!(
                        "baseline degraded: {} cm from {} samples, no usable echo",
                        baseline.distance_cm,
                        baseline.samples
                    );
                } else {
                    log_info!(
                        "baseline ready: {} cm from {} samples",
                        baseline.distance_cm,
                        baseline.samples
                    );
                }
                self.mapper = Some(SensorSeverityMapper::new(baseline));
                Some(baseline)
            }
            CalibrationStatus::Pending { .. } | CalibrationStatus::Ready(_) => None,
        };

        Step::Calibrating {
            sample: filtered,
            speed: self.config.calibration_command(),
            baseline,
        }
    }
}
