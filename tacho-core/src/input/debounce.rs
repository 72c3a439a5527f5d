//! Single-input debouncer

/// Debounce state for one input
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    delay_ms: u64,
    stable: bool,
    last_raw: bool,
    last_change_ms: u64,
}

impl Debouncer {
    /// New debouncer, initially released
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            stable: false,
            last_raw: false,
            last_change_ms: 0,
        }
    }

    /// Accepted level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample
    ///
    /// Returns the new level when a change is accepted.
    pub fn update(&mut self, raw: bool, now_ms: u64) -> Option<bool> {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_ms = now_ms;
            return None;
        }

        if raw != self.stable && now_ms.saturating_sub(self.last_change_ms) >= self.delay_ms {
            self.stable = raw;
            return Some(raw);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_accepted_after_delay() {
        let mut db = Debouncer::new(50);
        assert_eq!(db.update(true, 0), None);
        assert_eq!(db.update(true, 49), None);
        assert_eq!(db.update(true, 50), Some(true));
        assert!(db.is_pressed());
    }

    #[test]
    fn test_held_button_emits_once() {
        let mut db = Debouncer::new(50);
        db.update(true, 0);
        assert_eq!(db.update(true, 50), Some(true));
        for t in (100..2_000).step_by(50) {
            assert_eq!(db.update(true, t), None);
        }
    }

    #[test]
    fn test_bounce_restarts_window() {
        let mut db = Debouncer::new(50);
        db.update(true, 0);
        db.update(false, 20);
        db.update(true, 40);
        assert_eq!(db.update(true, 80), None);
        assert_eq!(db.update(true, 90), Some(true));
    }

    #[test]
    fn test_release_is_reported() {
        let mut db = Debouncer::new(50);
        db.update(true, 0);
        db.update(true, 50);
        db.update(false, 100);
        assert_eq!(db.update(false, 150), Some(false));
        assert!(!db.is_pressed());
    }
}
