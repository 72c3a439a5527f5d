//! Motor drive and operator indication outputs

use crate::state::OperatingMode;

/// Status LED colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorColor {
    Blue,
    Green,
    Red,
}

impl IndicatorColor {
    /// Which of the red, green and blue channels are lit
    pub fn channels(self) -> (bool, bool, bool) {
        match self {
            IndicatorColor::Red => (true, false, false),
            IndicatorColor::Green => (false, true, false),
            IndicatorColor::Blue => (false, false, true),
        }
    }
}

/// Outputs driven by the controller
pub trait MotorActuator {
    /// Set motor drive duty, 0 (off) to 255 (full)
    fn set_motor_command(&mut self, duty: u8);

    /// Show the operating mode on the status indicator
    fn set_indicator(&mut self, mode: OperatingMode);

    /// Switch the alarm tone on or off
    fn set_alarm_sound(&mut self, on: bool, frequency_hz: u32);
}
