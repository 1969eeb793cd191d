//! Core control loop for RoadGuard
//!
//! Drives a small ground vehicle over uneven road: an ultrasonic sensor
//! looks down at the surface, a rise toward the sensor means a hazard, and
//! the vehicle slows in proportion. Separately, a reported severity and a
//! smoothed road score are derived from the speed actually commanded and
//! sent to the dashboard whenever they change.
//!
//! Key constraints:
//! - Runs on an ESP32 next to the Wi-Fi stack
//! - No heap allocation anywhere in the control path
//! - No fatal errors: every fault degrades to a held value or a skipped cycle
//!
//! ```no_run
//! use roadguard_core::{Controller, DistanceSample, Step};
//!
//! let mut controller = Controller::default();
//!
//! // One cycle: sample in, speed decision out
//! match controller.step(DistanceSample::Echo(19.8), 0) {
//!     Step::Calibrating { speed, .. } => {}, // learning the baseline
//!     Step::Running { assessment, emission, .. } => {}, // drive and report
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod calibration;
pub mod config;
pub mod constants;
pub mod control_loop;
pub mod controller;
pub mod errors;
pub mod estimator;
pub mod filter;
pub mod gate;
pub mod severity;
pub mod telemetry;
pub mod time;
pub mod traits;

// Public API
pub use calibration::{Baseline, BaselineCalibrator};
pub use config::ControllerConfig;
pub use control_loop::{ControlLoop, CycleOutcome, CyclePhase, Delivery, LoopStats};
pub use controller::{Controller, Step};
pub use errors::{ConfigError, ConfigResult};
pub use estimator::{Reported, ReportedEstimator, RoadScore};
pub use filter::{DistanceFilter, DistanceSample};
pub use gate::ChangeGate;
pub use severity::{SensorSeverityMapper, Severity, SpeedCommand};
pub use telemetry::{HazardTally, MonitorLine, TelemetryRecord};
pub use time::{ManualClock, TimeSource, Timestamp};
pub use traits::{
    AlwaysOnline, Connectivity, Direction, MonitorSink, MotionActuator, RangeSensor, TelemetrySink,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
