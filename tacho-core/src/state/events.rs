//! Events that trigger mode transitions

/// Events that can trigger mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    /// Operator selected Run
    Start,
    /// Operator selected Stop
    Stop,
    /// Alarm monitor detected a fault
    AlarmRaised,
    /// Alarm monitor completed its clear window
    AlarmReleased,
}

impl ModeEvent {
    /// Check if this event comes from the operator
    pub fn is_operator_event(&self) -> bool {
        matches!(self, ModeEvent::Start | ModeEvent::Stop)
    }
}
