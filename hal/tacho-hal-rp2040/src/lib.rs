//! RP2040-specific HAL for the motor speed controller
//!
//! This crate provides RP2040 implementations of the shared `tacho-hal`
//! and `tacho-core` traits:
//!
//! - GPIO wrappers for buttons and the RGB indicator
//! - ADC speed/current sensing
//! - PWM motor drive and alarm buzzer
//! - EEPROM emulation in the last flash sector

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod flash;
pub mod gpio;
pub mod pwm;

pub use adc::AdcSensor;
pub use flash::{FlashEeprom, FlashSector};
pub use gpio::{RpInput, RpOutput};
pub use pwm::PwmActuator;
