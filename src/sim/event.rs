//! Scripted grid disturbance events.

/// A scripted feeder outage derating one zone over `[start_step, end_step)`.
#[derive(Debug, Clone, Copy)]
pub struct OutageEvent {
    /// Index of the affected zone.
    pub zone: usize,
    /// Start timestep (inclusive).
    pub start_step: usize,
    /// End timestep (exclusive).
    pub end_step: usize,
    /// Residual capacity fraction while active (0.0 = feeder lost).
    pub derate: f32,
}

impl OutageEvent {
    /// Creates an outage spanning `[start_step, end_step)`.
    ///
    /// # Panics
    ///
    /// Panics if `start_step >= end_step` or `derate` is outside `[0, 1]`.
    pub fn new(zone: usize, start_step: usize, end_step: usize, derate: f32) -> Self {
        assert!(start_step < end_step);
        assert!((0.0..=1.0).contains(&derate));

        Self {
            zone,
            start_step,
            end_step,
            derate,
        }
    }

    /// Returns `true` when `timestep` falls within the active window.
    pub fn is_active(&self, timestep: usize) -> bool {
        timestep >= self.start_step && timestep < self.end_step
    }

    /// Capacity factor to apply at `timestep`: the derate while active,
    /// `1.0` otherwise.
    pub fn derate_at(&self, timestep: usize) -> f32 {
        if self.is_active(timestep) {
            self.derate
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OutageEvent;

    #[test]
    fn active_only_inside_window() {
        let event = OutageEvent::new(1, 5, 8, 0.4);
        assert!(!event.is_active(4));
        assert!(event.is_active(5));
        assert!(event.is_active(7));
        assert!(!event.is_active(8));
    }

    #[test]
    fn derate_is_full_capacity_outside_window() {
        let event = OutageEvent::new(0, 10, 12, 0.25);
        assert_eq!(event.derate_at(9), 1.0);
        assert_eq!(event.derate_at(10), 0.25);
        assert_eq!(event.derate_at(11), 0.25);
        assert_eq!(event.derate_at(12), 1.0);
    }

    #[test]
    #[should_panic]
    fn inverted_window_panics() {
        OutageEvent::new(0, 8, 8, 0.5);
    }

    #[test]
    #[should_panic]
    fn derate_above_one_panics() {
        OutageEvent::new(0, 1, 2, 1.5);
    }
}
