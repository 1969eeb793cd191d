//! Simulated Drive - the full control loop on a host machine
//!
//! Runs the controller against a synthetic road: two seconds of flat
//! surface for calibration, a speed bump, a stretch of lost echoes and a
//! sharp 3.5 cm rise. Time is simulated, so the run finishes instantly;
//! each tick advances the clock by the delay the loop asked for.
//!
//! ```bash
//! cargo run --example 01_simulated_drive
//! ```

use core::convert::Infallible;

use roadguard_core::{
    AlwaysOnline, ControlLoop, Controller, ControllerConfig, CyclePhase, Direction,
    DistanceSample, ManualClock, MotionActuator, RangeSensor, SpeedCommand, TelemetryRecord,
    TelemetrySink, TimeSource,
};

/// Sensor mounted 20 cm above flat road
struct SyntheticRoad {
    cycle: usize,
}

impl RangeSensor for SyntheticRoad {
    fn read_distance(&mut self) -> DistanceSample {
        self.cycle += 1;
        match self.cycle {
            0..=45 => DistanceSample::Echo(20.0 + 0.05 * ((self.cycle % 3) as f32 - 1.0)),
            46..=52 => DistanceSample::Echo(18.8), // 1.2 cm bump
            53..=60 => DistanceSample::NoEcho,     // sensor blinded
            61..=80 => DistanceSample::Echo(20.0),
            81..=85 => DistanceSample::Echo(16.5),
            _ => DistanceSample::Echo(20.0),
        }
    }
}

/// Prints motor commands when they change
#[derive(Default)]
struct ConsoleMotors {
    last: Option<SpeedCommand>,
}

impl MotionActuator for ConsoleMotors {
    fn set_direction(&mut self, _direction: Direction) {}

    fn set_speed(&mut self, speed: SpeedCommand) {
        if self.last != Some(speed) {
            println!("  motors -> duty {}", speed);
            self.last = Some(speed);
        }
    }
}

/// Prints telemetry records as the dashboard would receive them
struct ConsoleSink;

impl TelemetrySink for ConsoleSink {
    type Error = Infallible;

    fn send(&mut self, record: &TelemetryRecord) -> Result<(), Self::Error> {
        println!("  telemetry {}", record.monitor_line());
        Ok(())
    }
}

fn main() {
    println!("=== RoadGuard Simulated Drive ===\n");

    let controller = match Controller::new(ControllerConfig::default()) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("bad configuration: {}", e);
            return;
        }
    };

    let clock = ManualClock::new(0);
    let mut control = ControlLoop::new(
        controller,
        SyntheticRoad { cycle: 0 },
        ConsoleMotors::default(),
        ConsoleSink,
        AlwaysOnline,
        &clock,
    );

    control.start();

    for _ in 0..140 {
        let outcome = control.tick();
        if let CyclePhase::Calibrating { baseline: Some(baseline), .. } = outcome.phase {
            println!(
                "[{:>5} ms] baseline ready: {:.2} cm ({} samples)",
                clock.now(),
                baseline.distance_cm,
                baseline.samples
            );
        }
        clock.advance(outcome.delay_ms as u64);
    }

    let stats = control.stats();
    println!("\n=== Summary ===");
    println!("Cycles:        {}", stats.cycles);
    println!("Records sent:  {}", stats.emissions);
    println!("Hazards:       {}", control.controller().hazard_count());
    println!("Road score:    {:.1}", control.controller().road_score());
}
