//! Error Types for Controller Configuration
//!
//! ## Design Philosophy
//!
//! The control path has no fatal errors. A missed echo is held over, an
//! empty calibration window degrades to a zero baseline, a dropped link
//! skips the cycle and out-of-range numbers are clamped. What remains is
//! rejecting a configuration that could never produce sane behavior, and
//! that happens once, before the loop starts.
//!
//! Like the rest of the core, errors are small and `Copy`: no `String`,
//! only `&'static str` names and the offending number.
//!
//! ```rust
//! use roadguard_core::{ConfigError, ControllerConfig};
//!
//! let config = ControllerConfig::default().with_filter_alpha(1.5);
//! match config.validate() {
//!     Err(ConfigError::OutOfRange { name, .. }) => assert_eq!(name, "filter_alpha"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A tunable lies outside the interval it is defined on
    #[error("{name} = {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field
        name: &'static str,
        /// The configured value
        value: f32,
        /// Smallest accepted value
        min: f32,
        /// Largest accepted value
        max: f32,
    },

    /// A value that must be a finite number is NaN or infinite
    #[error("{name} is not a finite number")]
    NotFinite {
        /// Name of the offending field
        name: &'static str,
    },

    /// A duration that must be positive is zero
    #[error("{name} must be greater than zero")]
    ZeroDuration {
        /// Name of the offending field
        name: &'static str,
    },

    /// Smoothing rates would reward speeding up faster than they punish slowing down
    #[error("recovery rate {k_up} exceeds drop rate {k_down}")]
    InvertedSmoothing {
        /// Blend rate applied while the score recovers
        k_up: f32,
        /// Blend rate applied while the score drops
        k_down: f32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfRange { name, value, min, max } =>
                defmt::write!(fmt, "{} = {} outside [{}, {}]", name, value, min, max),
            Self::NotFinite { name } =>
                defmt::write!(fmt, "{} not finite", name),
            Self::ZeroDuration { name } =>
                defmt::write!(fmt, "{} must be > 0", name),
            Self::InvertedSmoothing { k_up, k_down } =>
                defmt::write!(fmt, "k_up {} > k_down {}", k_up, k_down),
        }
    }
}
