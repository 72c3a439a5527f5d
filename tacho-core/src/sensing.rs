//! Raw feedback to engineering units
//!
//! Both channels map linearly: `value = raw * full_scale / (resolution - 1)`.
//! The current channel subtracts a runtime zero offset first, set by the
//! calibration wizard.

use crate::config::{ControllerConfig, Parameters};
use crate::traits::{MotorSensor, SensorError};

/// One sensing tick's result in engineering units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub speed_rpm: f32,
    pub current_a: f32,
    /// Current at or above the overcurrent threshold
    pub overcurrent: bool,
}

/// A measurement, or the reason there is none this tick
pub type SensorReading = Result<Measurement, SensorError>;

/// Map a raw ADC count onto `0..=full_scale`
pub fn scale_raw(raw: u16, resolution: u16, full_scale: f32) -> Result<f32, SensorError> {
    if resolution < 2 {
        return Err(SensorError::Conversion);
    }
    if raw >= resolution {
        return Err(SensorError::OutOfRange);
    }
    Ok(raw as f32 * full_scale / (resolution - 1) as f32)
}

/// True when `current_a` has reached `threshold` of the current full scale
pub fn is_overcurrent(current_a: f32, params: &Parameters, threshold: f32) -> bool {
    current_a >= threshold * params.current_full_scale
}

/// Sampling state: converter resolution, threshold and tare offset
#[derive(Debug, Clone)]
pub struct Sensing {
    resolution: u16,
    overcurrent_threshold: f32,
    current_offset: u16,
    last: Option<Measurement>,
}

impl Sensing {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            resolution: config.adc_resolution,
            overcurrent_threshold: config.overcurrent_threshold,
            current_offset: 0,
            last: None,
        }
    }

    /// Read both channels and convert them
    pub fn sample<S: MotorSensor>(&mut self, sensor: &mut S, params: &Parameters) -> SensorReading {
        let raw_speed = sensor.read_raw_speed()?;
        let speed_rpm = scale_raw(raw_speed, self.resolution, params.speed_full_scale as f32)?;
        let current_a = self.read_current(sensor, params)?;

        let measurement = Measurement {
            speed_rpm,
            current_a,
            overcurrent: is_overcurrent(current_a, params, self.overcurrent_threshold),
        };
        self.last = Some(measurement);
        Ok(measurement)
    }

    /// Read only the current channel, tare applied
    pub fn read_current<S: MotorSensor>(
        &mut self,
        sensor: &mut S,
        params: &Parameters,
    ) -> Result<f32, SensorError> {
        let raw = sensor.read_raw_current()?;
        if raw >= self.resolution {
            return Err(SensorError::OutOfRange);
        }
        scale_raw(
            raw.saturating_sub(self.current_offset),
            self.resolution,
            params.current_full_scale,
        )
    }

    /// Take the present raw current as the zero point
    pub fn tare_current<S: MotorSensor>(&mut self, sensor: &mut S) -> Result<u16, SensorError> {
        let raw = sensor.read_raw_current()?;
        if raw >= self.resolution {
            return Err(SensorError::OutOfRange);
        }
        self.current_offset = raw;
        info!("Current zero offset set to {} counts", raw);
        Ok(raw)
    }

    pub fn current_offset(&self) -> u16 {
        self.current_offset
    }

    pub fn overcurrent_threshold(&self) -> f32 {
        self.overcurrent_threshold
    }

    /// Latest successful measurement
    pub fn last(&self) -> Option<Measurement> {
        self.last
    }
}
