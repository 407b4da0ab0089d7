use std::time::{Duration, Instant};

/// Trailing-edge debounce timer driven by caller supplied instants.
///
/// Every `schedule` pushes the deadline to `now + window`; the timer fires
/// once, the first time it is polled at or after that deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Returns `true` exactly once per quiet period, then disarms
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(start);

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(499)));
        assert!(debouncer.fire_if_due(start + WINDOW));
        assert!(!debouncer.fire_if_due(start + WINDOW * 2));
    }

    #[test]
    fn test_rescheduling_pushes_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(400));

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(600)));
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(900))
        );
        assert!(debouncer.fire_if_due(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_cancel_disarms() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(start);
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(start + WINDOW * 10));
    }
}
