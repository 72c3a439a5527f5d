//! Alarm monitor with dwell-based release

use crate::config::{ControllerConfig, Parameters};
use crate::sensing::SensorReading;

/// Fault conditions that force the motor off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmKind {
    /// Feedback could not be read
    SensorFault,
    /// Current at or above the overcurrent threshold
    Overcurrent,
    /// Speed above the overspeed limit
    Overspeed,
}

impl AlarmKind {
    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            AlarmKind::SensorFault => "SENSOR FAULT",
            AlarmKind::Overcurrent => "OVERCURRENT",
            AlarmKind::Overspeed => "OVERSPEED",
        }
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmVerdict {
    /// No alarm, nothing to do
    Clear,
    /// A fault is present this tick
    Raised(AlarmKind),
    /// Alarm still latched while the clear window runs
    Holding(AlarmKind),
    /// The clear window completed; the alarm is released
    Released(AlarmKind),
}

/// Tracks the active alarm and its clear window
#[derive(Debug, Clone)]
pub struct AlarmMonitor {
    active: Option<AlarmKind>,
    /// Start of the current uninterrupted clear window
    clear_since_ms: Option<u64>,
    clear_delay_ms: u64,
    overspeed_factor: f32,
}

impl AlarmMonitor {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            active: None,
            clear_since_ms: None,
            clear_delay_ms: config.timing.alarm_clear_ms,
            overspeed_factor: config.overspeed_factor,
        }
    }

    pub fn active(&self) -> Option<AlarmKind> {
        self.active
    }

    /// Classify a reading; the first matching condition wins
    fn detect(&self, reading: &SensorReading, params: &Parameters) -> Option<AlarmKind> {
        match reading {
            Err(_) => Some(AlarmKind::SensorFault),
            Ok(m) if m.overcurrent => Some(AlarmKind::Overcurrent),
            Ok(m) if m.speed_rpm > params.speed_full_scale as f32 * self.overspeed_factor => {
                Some(AlarmKind::Overspeed)
            }
            Ok(_) => None,
        }
    }

    /// Evaluate one sensing tick
    pub fn evaluate(
        &mut self,
        reading: &SensorReading,
        params: &Parameters,
        now_ms: u64,
    ) -> AlarmVerdict {
        if let Some(kind) = self.detect(reading, params) {
            if self.active != Some(kind) {
                warn!("Alarm raised: {:?}", kind);
            }
            self.active = Some(kind);
            self.clear_since_ms = None;
            return AlarmVerdict::Raised(kind);
        }

        let Some(kind) = self.active else {
            return AlarmVerdict::Clear;
        };

        let since = *self.clear_since_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(since) >= self.clear_delay_ms {
            info!("Alarm cleared: {:?}", kind);
            self.active = None;
            self.clear_since_ms = None;
            AlarmVerdict::Released(kind)
        } else {
            AlarmVerdict::Holding(kind)
        }
    }
}
