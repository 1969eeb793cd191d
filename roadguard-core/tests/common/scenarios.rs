//! Road profiles for integration tests
//!
//! Distances are what a downward-looking sensor mounted 20 cm above flat
//! road would read: a bump reads closer, a pothole reads further.

use roadguard_core::DistanceSample;

/// Mount height over flat road (cm)
pub const MOUNT_CM: f32 = 20.0;

/// Cycles needed to close a 2 s calibration window at 50 ms per cycle
pub const CALIBRATION_CYCLES: usize = 41;

/// `cycles` readings of flat road
pub fn flat(cycles: usize) -> Vec<DistanceSample> {
    vec![DistanceSample::Echo(MOUNT_CM); cycles]
}

/// `cycles` readings over a bump of `height_cm`
pub fn bump(height_cm: f32, cycles: usize) -> Vec<DistanceSample> {
    vec![DistanceSample::Echo(MOUNT_CM - height_cm); cycles]
}

/// Flat road with every `every`-th echo lost
pub fn flat_with_dropouts(cycles: usize, every: usize) -> Vec<DistanceSample> {
    (0..cycles)
        .map(|i| {
            if every > 0 && i % every == every - 1 {
                DistanceSample::NoEcho
            } else {
                DistanceSample::Echo(MOUNT_CM)
            }
        })
        .collect()
}
