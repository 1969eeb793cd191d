//! Controller configuration
//!
//! Defaults reproduce the tuned firmware behavior; change them for a
//! different chassis or sensor mount. Threshold bands and the speed table
//! are fixed in [`crate::constants`] and are not part of this struct; the
//! fast reference the reported channel measures against is always the
//! severity-0 table speed. Unknown fields are rejected when deserializing.
//!
//! ```rust
//! use roadguard_core::ControllerConfig;
//!
//! let config = ControllerConfig::default()
//!     .with_calibration_window_ms(3000)
//!     .with_running_delay_ms(50);
//! assert!(config.validate().is_ok());
//! ```

use crate::constants::control::{K_DOWN, K_UP, SPEED_CALIBRATING, SPEED_STARTUP};
use crate::constants::ranging::{CALIBRATION_WINDOW_MS, FILTER_ALPHA, MIN_VALID_DISTANCE_CM};
use crate::constants::time::{
    CALIBRATING_DELAY_MS, MS_PER_SECOND, RECONNECT_DELAY_MS, RUNNING_DELAY_MS,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::severity::{speed_for, Severity, SpeedCommand};

/// Longest calibration window accepted (ms)
const MAX_CALIBRATION_WINDOW_MS: u64 = 60 * MS_PER_SECOND;

/// Tunables for one controller instance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ControllerConfig {
    /// Weight of the newest sample in the distance filter, `(0, 1]`
    pub filter_alpha: f32,
    /// Readings at or below this are treated as missed echoes (cm)
    pub noise_floor_cm: f32,
    /// Baseline learning window (ms)
    pub calibration_window_ms: u64,
    /// Duty held while calibrating
    pub calibration_speed: u8,
    /// Duty applied at power-on
    pub startup_speed: u8,
    /// Road score blend rate while recovering
    pub k_up: f32,
    /// Road score blend rate while dropping
    pub k_down: f32,
    /// Pause after a calibration cycle (ms)
    pub calibrating_delay_ms: u32,
    /// Pause after a running cycle (ms)
    pub running_delay_ms: u32,
    /// Pause after a reconnect attempt (ms)
    pub reconnect_delay_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            filter_alpha: FILTER_ALPHA,
            noise_floor_cm: MIN_VALID_DISTANCE_CM,
            calibration_window_ms: CALIBRATION_WINDOW_MS,
            calibration_speed: SPEED_CALIBRATING,
            startup_speed: SPEED_STARTUP,
            k_up: K_UP,
            k_down: K_DOWN,
            calibrating_delay_ms: CALIBRATING_DELAY_MS,
            running_delay_ms: RUNNING_DELAY_MS,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
        }
    }
}

impl ControllerConfig {
    /// Set the distance filter weight
    pub fn with_filter_alpha(mut self, alpha: f32) -> Self {
        self.filter_alpha = alpha;
        self
    }

    /// Set the echo noise floor
    pub fn with_noise_floor_cm(mut self, noise_floor_cm: f32) -> Self {
        self.noise_floor_cm = noise_floor_cm;
        self
    }

    /// Set the calibration window
    pub fn with_calibration_window_ms(mut self, window_ms: u64) -> Self {
        self.calibration_window_ms = window_ms;
        self
    }

    /// Set the road score blend rates
    pub fn with_smoothing(mut self, k_up: f32, k_down: f32) -> Self {
        self.k_up = k_up;
        self.k_down = k_down;
        self
    }

    /// Set the pause between running cycles
    pub fn with_running_delay_ms(mut self, delay_ms: u32) -> Self {
        self.running_delay_ms = delay_ms;
        self
    }

    /// Calibration speed as a command
    pub fn calibration_command(&self) -> SpeedCommand {
        SpeedCommand::new(self.calibration_speed)
    }

    /// Startup speed as a command
    pub fn startup_command(&self) -> SpeedCommand {
        SpeedCommand::new(self.startup_speed)
    }

    /// Fast reference speed: the table speed for a clear road
    pub fn fast_command(&self) -> SpeedCommand {
        speed_for(Severity::None)
    }

    /// Check every field against the interval it is meaningful on
    pub fn validate(&self) -> ConfigResult<()> {
        check_unit("filter_alpha", self.filter_alpha, false)?;
        check_finite("noise_floor_cm", self.noise_floor_cm)?;
        if self.noise_floor_cm < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "noise_floor_cm",
                value: self.noise_floor_cm,
                min: 0.0,
                max: f32::MAX,
            });
        }

        if self.calibration_window_ms == 0 {
            return Err(ConfigError::ZeroDuration { name: "calibration_window_ms" });
        }
        if self.calibration_window_ms > MAX_CALIBRATION_WINDOW_MS {
            return Err(ConfigError::OutOfRange {
                name: "calibration_window_ms",
                value: self.calibration_window_ms as f32,
                min: 1.0,
                max: MAX_CALIBRATION_WINDOW_MS as f32,
            });
        }

        check_unit("k_up", self.k_up, true)?;
        check_unit("k_down", self.k_down, true)?;
        if self.k_up > self.k_down {
            return Err(ConfigError::InvertedSmoothing { k_up: self.k_up, k_down: self.k_down });
        }

        if self.running_delay_ms == 0 {
            return Err(ConfigError::ZeroDuration { name: "running_delay_ms" });
        }

        Ok(())
    }
}

fn check_finite(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name })
    }
}

/// `(0, 1]`, or `[0, 1]` when `allow_zero`
fn check_unit(name: &'static str, value: f32, allow_zero: bool) -> ConfigResult<()> {
    check_finite(name, value)?;
    let above_min = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if above_min && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, min: 0.0, max: 1.0 })
    }
}
