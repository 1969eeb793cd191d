//! Ultrasonic Ranging and Baseline Calibration
//!
//! Values for an HC-SR04 class sensor sampled from a 16 Hz control loop.

// ===== ECHO CONVERSION =====

/// Echo pulse timeout (µs).
///
/// 30 ms covers a round trip of roughly 5 m. A pulse that does not return
/// within this window is reported as "no echo".
pub const ECHO_TIMEOUT_US: u32 = 30_000;

/// Speed of sound in air (cm/µs) at about 20 °C.
///
/// Distance is `duration × SOUND_CM_PER_US / 2` for the round trip.
pub const SOUND_CM_PER_US: f32 = 0.0343;

// ===== SAMPLE VALIDITY =====

/// Measurement noise floor (cm).
///
/// Readings at or below this are treated like a missed echo and replaced by
/// the previous filtered distance.
pub const MIN_VALID_DISTANCE_CM: f32 = 0.1;

// ===== FILTER =====

/// Weight of the newest sample in the distance filter.
///
/// Close to 1 on purpose: hazard latency translates directly into stopping
/// distance, so the filter tracks fast and only shaves single-sample jitter.
pub const FILTER_ALPHA: f32 = 0.85;

// ===== CALIBRATION =====

/// Length of the baseline learning window after power-on (ms).
pub const CALIBRATION_WINDOW_MS: u64 = 2000;
