//! Millisecond time source and periodic task gating

use core::cell::Cell;

/// Monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed epoch
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Clock that only moves when told to
///
/// Used by host tests and simulations to step the controller through time.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Fixed-interval gate for a cooperative task
///
/// The first check is always due. Afterwards the task runs again once at
/// least `interval_ms` has elapsed since it last ran.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cadence {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl Cadence {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Returns true (and restarts the interval) when the task should run
    pub fn due(&mut self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Restart the interval without running the task
    pub fn restart(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_check_is_due() {
        let mut cadence = Cadence::new(10);
        assert!(cadence.due(0));
        assert!(!cadence.due(9));
        assert!(cadence.due(10));
    }

    #[test]
    fn test_late_check_rebases_interval() {
        let mut cadence = Cadence::new(10);
        assert!(cadence.due(0));
        assert!(cadence.due(25));
        assert!(!cadence.due(34));
        assert!(cadence.due(35));
    }

    #[test]
    fn test_restart_defers() {
        let mut cadence = Cadence::new(500);
        cadence.restart(100);
        assert!(!cadence.due(599));
        assert!(cadence.due(600));
    }

    #[test]
    fn test_manual_clock_through_reference() {
        let clock = ManualClock::new(5);
        let by_ref = &clock;
        clock.advance(10);
        assert_eq!(by_ref.now_ms(), 15);
        clock.set(2);
        assert_eq!(by_ref.now_ms(), 2);
    }
}
