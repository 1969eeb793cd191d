//! Time-Related Constants
//!
//! Unit conversions and the pacing of the control loop.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== LOOP PACING =====

/// Delay between cycles while calibrating (ms).
pub const CALIBRATING_DELAY_MS: u32 = 50;

/// Delay between running cycles (ms), roughly 16 Hz.
pub const RUNNING_DELAY_MS: u32 = 60;

/// Delay after a reconnect attempt before the next cycle (ms).
pub const RECONNECT_DELAY_MS: u32 = 200;
