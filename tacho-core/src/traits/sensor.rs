//! Speed and current feedback

/// Errors that can occur while sampling feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Raw reading outside the converter's range
    OutOfRange,
    /// ADC conversion failed
    Conversion,
}

/// Raw analog feedback from the motor
///
/// Both channels return ADC counts in `0..resolution`. Scaling to physical
/// units happens in [`crate::sensing`] so it can follow the editable full
/// scale parameters.
pub trait MotorSensor {
    fn read_raw_speed(&mut self) -> Result<u16, SensorError>;

    fn read_raw_current(&mut self) -> Result<u16, SensorError>;
}
