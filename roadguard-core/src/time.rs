//! Time management for the control loop
//!
//! The controller only ever needs a monotonic millisecond count: the
//! calibration window is measured against it and nothing else. Sources:
//! - `StdMonotonic` on hosted builds (wraps `std::time::Instant`)
//! - `ManualClock` for tests and simulations
//! - any board timer, by implementing `TimeSource`

use core::cell::Cell;

/// Milliseconds since device boot
pub type Timestamp = u64;

/// Source of monotonic time for the control loop
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Monotonic time since construction (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdMonotonic {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdMonotonic {
    /// Start counting from now
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for StdMonotonic {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for StdMonotonic {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Hand-driven clock for tests and simulations
///
/// Interior mutability lets a test keep a shared reference while the
/// control loop holds `&ManualClock` as its time source.
#[derive(Debug, Default)]
pub struct ManualClock {
    timestamp: Cell<Timestamp>,
}

impl ManualClock {
    /// Create a clock reading `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: Cell::new(timestamp) }
    }

    /// Jump to an absolute time
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get().saturating_add(ms));
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

/// Elapsed milliseconds between two timestamps, zero if time went backwards
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}
