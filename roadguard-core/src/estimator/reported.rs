//! Reported severity from speed shortfall
//!
//! Bands are inclusive at the top: a shortfall of exactly 5 is still
//! severity 0, exactly 30 is severity 1, exactly 60 is severity 2.

use crate::constants::control::{SHORTFALL_MINOR, SHORTFALL_MODERATE, SHORTFALL_NONE};
use crate::severity::{Severity, SpeedCommand};

/// Severity implied by driving at `speed` when `fast` is the good pace
pub fn reported_severity(speed: SpeedCommand, fast: SpeedCommand) -> Severity {
    let shortfall = fast.duty() as i16 - speed.duty() as i16;

    if shortfall <= SHORTFALL_NONE {
        Severity::None
    } else if shortfall <= SHORTFALL_MINOR {
        Severity::Minor
    } else if shortfall <= SHORTFALL_MODERATE {
        Severity::Moderate
    } else {
        Severity::Severe
    }
}
