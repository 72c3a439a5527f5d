//! Mode ownership and edge reporting

use super::events::ModeEvent;
use super::machine::OperatingMode;
use crate::safety::{AlarmKind, AlarmVerdict};

/// Reasons an operator command is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// An alarm is latched
    AlarmActive,
    /// The command would not change the mode
    AlreadyInMode,
}

/// A mode edge, reported once when it happens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: OperatingMode,
    pub to: OperatingMode,
    pub event: ModeEvent,
}

/// Owns the current operating mode
#[derive(Debug, Clone, Default)]
pub struct ModeMachine {
    mode: OperatingMode,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    fn apply(&mut self, event: ModeEvent) -> Option<Transition> {
        let from = self.mode;
        let to = from.transition(event);
        if to == from {
            return None;
        }
        self.mode = to;
        info!("Mode {:?} -> {:?} on {:?}", from, to, event);
        Some(Transition { from, to, event })
    }

    /// Operator Start or Stop
    pub fn command(
        &mut self,
        event: ModeEvent,
        alarm: Option<AlarmKind>,
    ) -> Result<Transition, ModeError> {
        debug_assert!(event.is_operator_event());
        if alarm.is_some() || self.mode.is_alarm() {
            warn!("{:?} refused: alarm active", event);
            return Err(ModeError::AlarmActive);
        }
        self.apply(event).ok_or(ModeError::AlreadyInMode)
    }

    pub fn start(&mut self, alarm: Option<AlarmKind>) -> Result<Transition, ModeError> {
        self.command(ModeEvent::Start, alarm)
    }

    pub fn stop(&mut self, alarm: Option<AlarmKind>) -> Result<Transition, ModeError> {
        self.command(ModeEvent::Stop, alarm)
    }

    /// Follow the alarm monitor's verdict
    pub fn on_alarm(&mut self, verdict: AlarmVerdict) -> Option<Transition> {
        match verdict {
            AlarmVerdict::Raised(_) => self.apply(ModeEvent::AlarmRaised),
            AlarmVerdict::Released(_) => self.apply(ModeEvent::AlarmReleased),
            AlarmVerdict::Clear | AlarmVerdict::Holding(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_reports_edge_once() {
        let mut machine = ModeMachine::new();
        let t = machine.start(None).unwrap();
        assert_eq!((t.from, t.to), (OperatingMode::Idle, OperatingMode::Run));
        assert_eq!(machine.start(None), Err(ModeError::AlreadyInMode));
    }

    #[test]
    fn test_start_refused_with_alarm() {
        let mut machine = ModeMachine::new();
        assert_eq!(
            machine.start(Some(AlarmKind::Overcurrent)),
            Err(ModeError::AlarmActive)
        );
        assert_eq!(machine.mode(), OperatingMode::Idle);
    }

    #[test]
    fn test_raise_is_edge_triggered() {
        let mut machine = ModeMachine::new();
        machine.start(None).unwrap();

        let raised = AlarmVerdict::Raised(AlarmKind::Overcurrent);
        let t = machine.on_alarm(raised).unwrap();
        assert_eq!(t.to, OperatingMode::Alarm);
        assert_eq!(machine.on_alarm(raised), None);
        assert_eq!(
            machine.on_alarm(AlarmVerdict::Holding(AlarmKind::Overcurrent)),
            None
        );
    }

    #[test]
    fn test_release_returns_to_idle() {
        let mut machine = ModeMachine::new();
        machine.on_alarm(AlarmVerdict::Raised(AlarmKind::SensorFault));
        assert_eq!(machine.stop(None), Err(ModeError::AlarmActive));

        let t = machine
            .on_alarm(AlarmVerdict::Released(AlarmKind::SensorFault))
            .unwrap();
        assert_eq!((t.from, t.to), (OperatingMode::Alarm, OperatingMode::Idle));
    }
}
