//! ADC-based speed and current feedback
//!
//! Speed (tachogenerator) and current (shunt amplifier) arrive as analog
//! voltages on two ADC inputs. Reads are blocking single conversions,
//! a few microseconds each, so they fit inside a control tick.

use embassy_rp::adc::{Adc, Blocking, Channel};
use tacho_core::traits::{MotorSensor, SensorError};

/// RP2040 ADC resolution in counts
pub const ADC_RESOLUTION: u16 = 4096;

pub struct AdcSensor<'d> {
    adc: Adc<'d, Blocking>,
    speed: Channel<'d>,
    current: Channel<'d>,
}

impl<'d> AdcSensor<'d> {
    pub fn new(adc: Adc<'d, Blocking>, speed: Channel<'d>, current: Channel<'d>) -> Self {
        Self {
            adc,
            speed,
            current,
        }
    }
}

fn check(raw: u16) -> Result<u16, SensorError> {
    if raw >= ADC_RESOLUTION {
        Err(SensorError::OutOfRange)
    } else {
        Ok(raw)
    }
}

impl MotorSensor for AdcSensor<'_> {
    fn read_raw_speed(&mut self) -> Result<u16, SensorError> {
        let raw = self
            .adc
            .blocking_read(&mut self.speed)
            .map_err(|_| SensorError::Conversion)?;
        check(raw)
    }

    fn read_raw_current(&mut self) -> Result<u16, SensorError> {
        let raw = self
            .adc
            .blocking_read(&mut self.current)
            .map_err(|_| SensorError::Conversion)?;
        check(raw)
    }
}
