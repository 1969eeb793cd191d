//! Collaborator traits
//!
//! The core never touches pins, radios or sockets. Everything outside the
//! signal path is reached through these traits, one per concern. Keep
//! implementations thin: timing a pulse, writing a PWM channel, posting a
//! record.

use core::convert::Infallible;
use core::fmt;

use crate::filter::DistanceSample;
use crate::severity::SpeedCommand;
use crate::telemetry::TelemetryRecord;

/// Motor rotation direction
///
/// The controller only ever drives forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Direction {
    /// Both motors forward
    Forward,
}

/// Produces one distance sample on demand
pub trait RangeSensor {
    /// Take a reading
    ///
    /// Must return within the echo timeout; a missing echo is
    /// `DistanceSample::NoEcho`, never a block or a panic.
    fn read_distance(&mut self) -> DistanceSample;
}

/// Drives the motors
pub trait MotionActuator {
    /// Set rotation direction for both sides
    fn set_direction(&mut self, direction: Direction);

    /// Set PWM duty for both sides
    fn set_speed(&mut self, speed: SpeedCommand);
}

/// Accepts telemetry records, best effort
pub trait TelemetrySink {
    /// Delivery failure reason
    type Error: fmt::Display;

    /// Deliver one record; blocking from the loop's point of view
    fn send(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error>;
}

/// Reports and restores the network link
pub trait Connectivity {
    /// True if the link is up right now
    fn is_connected(&self) -> bool;

    /// Start a reconnect attempt; does not wait for the outcome
    fn reconnect(&mut self);
}

/// Link for setups without a network, always up
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_connected(&self) -> bool {
        true
    }

    fn reconnect(&mut self) {}
}

/// Sink that writes each record as a monitor line to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorSink;

impl TelemetrySink for MonitorSink {
    type Error = Infallible;

    fn send(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        log_info!("{}", record.monitor_line().as_str());
        Ok(())
    }
}
