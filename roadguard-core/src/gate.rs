//! Edge-triggered emission gate
//!
//! Telemetry goes out when the reported state changes, not every cycle.
//! The gate remembers the last value it let through and passes a new value
//! only if it differs. It is optimistic about delivery: the remembered
//! value is updated when the gate opens, whatever happens to the send.

/// Passes values that differ from the last one passed
#[derive(Debug, Clone)]
pub struct ChangeGate<T> {
    last: Option<T>,
}

impl<T> Default for ChangeGate<T> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<T: PartialEq + Copy> ChangeGate<T> {
    /// Create a gate that opens on the first value
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a value; returns true if it should be emitted
    pub fn observe(&mut self, value: T) -> bool {
        if self.last == Some(value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// Last value let through, if any
    pub fn last(&self) -> Option<T> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::Reported;
    use crate::severity::Severity;

    #[test]
    fn first_value_always_passes() {
        let mut gate = ChangeGate::new();
        assert_eq!(gate.last(), None);
        assert!(gate.observe((0u8, 100u8)));
        assert_eq!(gate.last(), Some((0, 100)));
    }

    #[test]
    fn repeats_then_one_change_emit_twice() {
        let mut gate = ChangeGate::new();
        let steady = Reported { severity: Severity::None, road_score: 100 };
        let changed = Reported { severity: Severity::None, road_score: 99 };

        let emitted = [steady, steady, steady, steady, steady, changed]
            .into_iter()
            .filter(|r| gate.observe(*r))
            .count();

        assert_eq!(emitted, 2);
        assert_eq!(gate.last(), Some(changed));
    }

    #[test]
    fn either_field_reopens_the_gate() {
        let mut gate = ChangeGate::new();
        assert!(gate.observe(Reported { severity: Severity::Minor, road_score: 90 }));
        assert!(gate.observe(Reported { severity: Severity::Moderate, road_score: 90 }));
        assert!(gate.observe(Reported { severity: Severity::Moderate, road_score: 89 }));
        assert!(!gate.observe(Reported { severity: Severity::Moderate, road_score: 89 }));
    }
}
