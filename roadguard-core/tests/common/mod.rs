//! Common test doubles and road profiles for integration tests
//!
//! This module provides:
//! - Scripted collaborators standing in for the sensor, motors, sink and link
//! - A stepping clock that advances on every read
//! - Road profile builders (flat, bump, dropouts)

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;

use roadguard_core::{
    Connectivity, Direction, DistanceSample, MotionActuator, RangeSensor, SpeedCommand,
    TelemetryRecord, TelemetrySink, TimeSource, Timestamp,
};

pub mod scenarios;

/// Sensor that replays a script, then repeats a fallback sample
pub struct ScriptedSensor {
    script: VecDeque<DistanceSample>,
    fallback: DistanceSample,
    pub reads: usize,
}

impl ScriptedSensor {
    pub fn new(script: Vec<DistanceSample>, fallback: DistanceSample) -> Self {
        Self { script: script.into(), fallback, reads: 0 }
    }

    /// Road that never changes
    pub fn flat(distance_cm: f32) -> Self {
        Self::new(Vec::new(), DistanceSample::Echo(distance_cm))
    }

    pub fn push(&mut self, samples: impl IntoIterator<Item = DistanceSample>) {
        self.script.extend(samples);
    }
}

impl RangeSensor for ScriptedSensor {
    fn read_distance(&mut self) -> DistanceSample {
        self.reads += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

/// Actuator that records every command
#[derive(Default)]
pub struct RecordingActuator {
    pub directions: Vec<Direction>,
    pub speeds: Vec<SpeedCommand>,
}

impl RecordingActuator {
    pub fn last_speed(&self) -> Option<u8> {
        self.speeds.last().map(|s| s.duty())
    }
}

impl MotionActuator for RecordingActuator {
    fn set_direction(&mut self, direction: Direction) {
        self.directions.push(direction);
    }

    fn set_speed(&mut self, speed: SpeedCommand) {
        self.speeds.push(speed);
    }
}

/// Error reported by a failing sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkDown;

impl fmt::Display for SinkDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote rejected record")
    }
}

/// Sink that records deliveries, optionally failing every send
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Vec<TelemetryRecord>,
    pub attempts: usize,
    pub failing: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }
}

impl TelemetrySink for RecordingSink {
    type Error = SinkDown;

    fn send(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.failing {
            return Err(SinkDown);
        }
        self.delivered.push(*record);
        Ok(())
    }
}

/// Link that is down until a number of reconnect attempts have been made
pub struct ScriptedLink {
    up: bool,
    attempts_needed: usize,
    pub reconnects: usize,
}

impl ScriptedLink {
    pub fn up() -> Self {
        Self { up: true, attempts_needed: 0, reconnects: 0 }
    }

    pub fn down_for(attempts_needed: usize) -> Self {
        Self { up: false, attempts_needed, reconnects: 0 }
    }

    pub fn drop_link(&mut self, attempts_needed: usize) {
        self.up = false;
        self.attempts_needed = attempts_needed;
        self.reconnects = 0;
    }
}

impl Connectivity for ScriptedLink {
    fn is_connected(&self) -> bool {
        self.up
    }

    fn reconnect(&mut self) {
        self.reconnects += 1;
        if self.reconnects >= self.attempts_needed {
            self.up = true;
        }
    }
}

/// Clock that moves forward a fixed step every time it is read
pub struct SteppingClock {
    now: Cell<Timestamp>,
    step: u64,
}

impl SteppingClock {
    pub fn new(step: u64) -> Self {
        Self { now: Cell::new(0), step }
    }
}

impl TimeSource for SteppingClock {
    fn now(&self) -> Timestamp {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
