//! Cooperative control loop
//!
//! One [`ControlLoop::tick`] is one iteration:
//!
//! ```text
//! link up? ──no──► reconnect, skip cycle
//!    │yes
//! read sensor ─► Controller::step ─► actuator ─► (sink, on change)
//! ```
//!
//! Nothing runs concurrently. The telemetry send blocks the loop, so a
//! slow network stretches the cycle; the loop never queues unsent records
//! and never retries them. Each tick returns how long to pause before the
//! next; [`ControlLoop::run`] sleeps for that on hosted builds, firmware
//! calls `tick` from its own timer.

use crate::calibration::Baseline;
use crate::controller::{Controller, Step};
use crate::estimator::Reported;
use crate::severity::SpeedCommand;
use crate::time::TimeSource;
use crate::traits::{Connectivity, Direction, MotionActuator, RangeSensor, TelemetrySink};

/// Fate of a change-triggered record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sink accepted the record
    Sent,
    /// Sink failed; the record is dropped
    Failed,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CyclePhase {
    /// Link was down; nothing was sensed or actuated
    Offline,
    /// Baseline still being learned
    Calibrating {
        /// Smoothed distance this cycle (cm)
        filtered_cm: f32,
        /// Set on the cycle that closed the window
        baseline: Option<Baseline>,
    },
    /// Sensor driving the speed
    Running {
        /// Speed applied
        speed: SpeedCommand,
        /// Reported state computed this cycle
        reported: Reported,
        /// Present only when the reported state changed
        delivery: Option<Delivery>,
    },
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutcome {
    /// What the cycle did
    pub phase: CyclePhase,
    /// Pause before the next tick (ms)
    pub delay_ms: u32,
}

/// Running counters for the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Ticks executed, including skipped ones
    pub cycles: u64,
    /// Ticks skipped for lack of connectivity
    pub offline_cycles: u64,
    /// Records handed to the sink
    pub emissions: u64,
    /// Records the sink failed to deliver
    pub send_failures: u64,
}

/// Owns the controller and its collaborators
pub struct ControlLoop<S, A, T, L, C> {
    controller: Controller,
    sensor: S,
    actuator: A,
    sink: T,
    link: L,
    clock: C,
    stats: LoopStats,
}

impl<S, A, T, L, C> ControlLoop<S, A, T, L, C>
where
    S: RangeSensor,
    A: MotionActuator,
    T: TelemetrySink,
    L: Connectivity,
    C: TimeSource,
{
    /// Wire a controller to its hardware and network
    pub fn new(controller: Controller, sensor: S, actuator: A, sink: T, link: L, clock: C) -> Self {
        Self {
            controller,
            sensor,
            actuator,
            sink,
            link,
            clock,
            stats: LoopStats::default(),
        }
    }

    /// Power-on posture: forward at startup speed
    pub fn start(&mut self) {
        let speed = self.controller.config().startup_command();
        self.actuator.set_direction(Direction::Forward);
        self.actuator.set_speed(speed);
        log_info!("control loop started at duty {}", speed.duty());
    }

    /// Run one iteration
    pub fn tick(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        if !self.link.is_connected() {
            self.stats.offline_cycles += 1;
            log_warn!("link down, reconnecting");
            self.link.reconnect();
            return CycleOutcome {
                phase: CyclePhase::Offline,
                delay_ms: self.controller.config().reconnect_delay_ms,
            };
        }

        let now = self.clock.now();
        let sample = self.sensor.read_distance();
        let step = self.controller.step(sample, now);

        match step {
            Step::Calibrating { sample, speed, baseline } => {
                self.actuator.set_speed(speed);
                log_debug!("{}", step.monitor_record().monitor_line().as_str());

                CycleOutcome {
                    phase: CyclePhase::Calibrating { filtered_cm: sample.filtered_cm, baseline },
                    delay_ms: self.controller.config().calibrating_delay_ms,
                }
            }
            Step::Running { assessment, reported, emission, .. } => {
                self.actuator.set_direction(Direction::Forward);
                self.actuator.set_speed(assessment.speed);

                let delivery = emission.map(|record| {
                    self.stats.emissions += 1;
                    match self.sink.send(&record) {
                        Ok(()) => Delivery::Sent,
                        Err(_err) => {
                            self.stats.send_failures += 1;
                            log_warn!(
                                "telemetry dropped: severity {} score {}",
                                record.severity,
                                record.road_score
                            );
                            #[cfg(feature = "log")]
                            log::debug!("sink error: {}", _err);
                            Delivery::Failed
                        }
                    }
                });

                CycleOutcome {
                    phase: CyclePhase::Running { speed: assessment.speed, reported, delivery },
                    delay_ms: self.controller.config().running_delay_ms,
                }
            }
        }
    }

    /// Tick forever, sleeping between cycles
    #[cfg(feature = "std")]
    pub fn run(&mut self) -> ! {
        self.start();
        loop {
            let outcome = self.tick();
            std::thread::sleep(std::time::Duration::from_millis(outcome.delay_ms as u64));
        }
    }

    /// The control state
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Loop counters
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// The range sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// The motor driver
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// The telemetry sink
    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// The link manager
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutable link manager, for tests that toggle connectivity
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Hand the collaborators back, dropping the loop
    pub fn into_parts(self) -> (Controller, S, A, T, L, C) {
        (self.controller, self.sensor, self.actuator, self.sink, self.link, self.clock)
    }
}
