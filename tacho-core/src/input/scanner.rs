//! Polls all four buttons on the input cadence

use heapless::Vec;

use super::debounce::Debouncer;
use crate::clock::Cadence;
use crate::config::Timing;
use crate::traits::{ButtonId, ButtonPanel};

/// Debounced edge for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub id: ButtonId,
    /// True on press, false on release
    pub pressed: bool,
}

/// Events produced by one poll, at most one per button
pub type Events = Vec<ButtonEvent, 4>;

/// Debouncers for every button plus the poll cadence
#[derive(Debug, Clone)]
pub struct ButtonScanner {
    cadence: Cadence,
    debouncers: [Debouncer; 4],
}

impl ButtonScanner {
    pub fn new(timing: &Timing) -> Self {
        Self {
            cadence: Cadence::new(timing.input_poll_ms),
            debouncers: [Debouncer::new(timing.debounce_ms); 4],
        }
    }

    /// Sample the panel if the poll period elapsed
    pub fn poll<B: ButtonPanel>(&mut self, panel: &mut B, now_ms: u64) -> Events {
        let mut events = Events::new();
        if !self.cadence.due(now_ms) {
            return events;
        }

        for id in ButtonId::ALL {
            let raw = panel.is_pressed(id);
            if let Some(pressed) = self.debouncers[id.index()].update(raw, now_ms) {
                trace!("Button {:?} pressed={}", id, pressed);
                // One slot per button
                let _ = events.push(ButtonEvent { id, pressed });
            }
        }
        events
    }
}
