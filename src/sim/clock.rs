//! Step clock driving the run loop.

/// Counts simulation steps up to a fixed total.
///
/// # Examples
///
/// ```
/// use citygrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(2);
/// assert_eq!(clock.tick(), Some(0));
/// assert_eq!(clock.tick(), Some(1));
/// assert_eq!(clock.tick(), None);
/// ```
pub struct Clock {
    current: usize,
    total: usize,
}

impl Clock {
    /// Creates a clock that will run for `total` steps.
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Advances by one step, returning the step index just consumed,
    /// or `None` once all steps have run.
    pub fn tick(&mut self) -> Option<usize> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(step)
        } else {
            None
        }
    }

    /// Steps left to run.
    pub fn remaining(&self) -> usize {
        self.total - self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_in_order_then_stops() {
        let mut clock = Clock::new(3);
        let mut seen = Vec::new();
        while let Some(t) = clock.tick() {
            seen.push(t);
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn remaining_counts_down() {
        let mut clock = Clock::new(2);
        assert_eq!(clock.remaining(), 2);
        clock.tick();
        assert_eq!(clock.remaining(), 1);
        clock.tick();
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn zero_step_clock_never_ticks() {
        let mut clock = Clock::new(0);
        assert_eq!(clock.tick(), None);
    }
}
