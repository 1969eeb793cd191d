//! Severity Mapping, Speed Table and Road Score
//!
//! Empirically tuned on the test track. Keep them as they are: both the
//! vehicle behavior and the recorded dashboard history depend on them.

// ===== ACTUATOR =====

/// Largest PWM duty value (8-bit LEDC channel).
pub const MAX_DUTY: u8 = 255;

// ===== SPEED TABLE (PWM duty by sensor severity) =====

/// Severity 0: the "good pace" reference speed.
pub const SPEED_FAST: u8 = 170;

/// Severity 1.
pub const SPEED_MINOR: u8 = 140;

/// Severity 2.
pub const SPEED_MODERATE: u8 = 110;

/// Severity 3.
pub const SPEED_SEVERE: u8 = 70;

/// Conservative speed held while the baseline is being learned.
pub const SPEED_CALIBRATING: u8 = 110;

/// Speed applied at power-on before the first control cycle.
pub const SPEED_STARTUP: u8 = 140;

// ===== SENSOR SEVERITY (height change, cm; upper bounds are exclusive) =====

/// Height change below this is severity 0.
pub const RAISE_MINOR_CM: f32 = 0.5;

/// Height change below this is severity 1.
pub const RAISE_MODERATE_CM: f32 = 1.5;

/// Height change below this is severity 2, at or above it severity 3.
pub const RAISE_SEVERE_CM: f32 = 3.0;

// ===== REPORTED SEVERITY (speed shortfall, duty; upper bounds are inclusive) =====

/// Shortfall up to this is reported as severity 0.
pub const SHORTFALL_NONE: i16 = 5;

/// Shortfall up to this is reported as severity 1.
pub const SHORTFALL_MINOR: i16 = 30;

/// Shortfall up to this is reported as severity 2, above it severity 3.
pub const SHORTFALL_MODERATE: i16 = 60;

/// Severity sent while the baseline is not ready yet.
pub const CALIBRATING_SEVERITY: i8 = -1;

// ===== ROAD SCORE =====

/// Blend rate while the score recovers toward a higher target.
pub const K_UP: f32 = 0.20;

/// Blend rate while the score drops toward a lower target.
pub const K_DOWN: f32 = 0.35;

/// Upper clamp, also the power-on value.
pub const ROAD_SCORE_MAX: f32 = 100.0;

/// Lower clamp.
pub const ROAD_SCORE_MIN: f32 = 0.0;
