//! Constants for RoadGuard Core
//!
//! Every tuned number in the controller lives here, next to a note on what
//! it controls. Threshold boundaries are compatibility constants: the
//! telemetry history on the dashboard was recorded against exactly these
//! values, so they are not exposed as configuration.
//!
//! ## Organization
//!
//! - **Ranging**: echo conversion, sample validity, filter and calibration window
//! - **Control**: severity thresholds, speed table, reported severity bands
//!   and road score smoothing
//! - **Time**: unit conversions and loop pacing

/// Ultrasonic ranging, filter and calibration constants.
pub mod ranging;

/// Severity thresholds, the speed table and road score smoothing.
pub mod control;

/// Time unit conversions and loop pacing.
pub mod time;

// Re-export commonly used constants for convenience
pub use ranging::{
    ECHO_TIMEOUT_US, SOUND_CM_PER_US, MIN_VALID_DISTANCE_CM,
    FILTER_ALPHA, CALIBRATION_WINDOW_MS,
};

pub use control::{
    MAX_DUTY, SPEED_FAST, SPEED_CALIBRATING, SPEED_STARTUP,
    K_UP, K_DOWN, ROAD_SCORE_MAX, ROAD_SCORE_MIN,
    CALIBRATING_SEVERITY,
};

pub use time::{
    MS_PER_SECOND, CALIBRATING_DELAY_MS, RUNNING_DELAY_MS, RECONNECT_DELAY_MS,
};
