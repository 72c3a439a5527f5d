//! Mode definition and the pure transition table

use super::events::ModeEvent;
use crate::traits::IndicatorColor;

/// Operating modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Motor off, ready to start
    #[default]
    Idle,
    /// Closed-loop speed control active
    Run,
    /// Fault latched; motor forced off
    Alarm,
}

impl OperatingMode {
    /// Check if this mode drives the motor
    pub fn motor_enabled(&self) -> bool {
        matches!(self, OperatingMode::Run)
    }

    pub fn is_alarm(&self) -> bool {
        matches!(self, OperatingMode::Alarm)
    }

    pub fn indicator(&self) -> IndicatorColor {
        match self {
            OperatingMode::Idle => IndicatorColor::Blue,
            OperatingMode::Run => IndicatorColor::Green,
            OperatingMode::Alarm => IndicatorColor::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperatingMode::Idle => "IDLE",
            OperatingMode::Run => "RUN",
            OperatingMode::Alarm => "ALARM",
        }
    }

    /// Process an event and return the next mode
    ///
    /// Events with no entry in the table leave the mode unchanged.
    pub fn transition(self, event: ModeEvent) -> Self {
        use ModeEvent::*;
        use OperatingMode::*;

        match (self, event) {
            (Idle, Start) => Run,
            (Run, Stop) => Idle,

            (Idle | Run, AlarmRaised) => Alarm,
            (Alarm, AlarmReleased) => Idle,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_stop() {
        assert_eq!(OperatingMode::Idle.transition(ModeEvent::Start), OperatingMode::Run);
        assert_eq!(OperatingMode::Run.transition(ModeEvent::Stop), OperatingMode::Idle);
    }

    #[test]
    fn test_alarm_from_any_mode() {
        for mode in [OperatingMode::Idle, OperatingMode::Run, OperatingMode::Alarm] {
            assert_eq!(mode.transition(ModeEvent::AlarmRaised), OperatingMode::Alarm);
        }
    }

    #[test]
    fn test_operator_cannot_leave_alarm() {
        assert_eq!(OperatingMode::Alarm.transition(ModeEvent::Start), OperatingMode::Alarm);
        assert_eq!(OperatingMode::Alarm.transition(ModeEvent::Stop), OperatingMode::Alarm);
    }

    #[test]
    fn test_release_goes_to_idle() {
        assert_eq!(
            OperatingMode::Alarm.transition(ModeEvent::AlarmReleased),
            OperatingMode::Idle
        );
        assert_eq!(
            OperatingMode::Run.transition(ModeEvent::AlarmReleased),
            OperatingMode::Run
        );
    }

    #[test]
    fn test_only_run_enables_motor() {
        assert!(OperatingMode::Run.motor_enabled());
        assert!(!OperatingMode::Idle.motor_enabled());
        assert!(!OperatingMode::Alarm.motor_enabled());
    }
}
