//! Tacho - DC Motor Speed Controller Firmware
//!
//! Main firmware binary for RP2040-based motor controller boards. Wires the
//! board peripherals into the board-agnostic [`Controller`] and drives it
//! from a single cooperative loop.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::{Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use tacho_core::clock::Clock;
use tacho_core::traits::PinButtons;
use tacho_core::Controller;
use tacho_display::TextDisplay;
use tacho_hal_rp2040::{AdcSensor, FlashSector, PwmActuator, RpInput, RpOutput};

use crate::config::CONTROLLER_CONFIG;
use crate::display::LogBackend;

mod config;
mod display;

/// Monotonic time from the embassy time driver
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Tacho firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = CONTROLLER_CONFIG;

    // Speed on ADC0 (GPIO26), current on ADC1 (GPIO27)
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let sensor = AdcSensor::new(
        adc,
        Channel::new_pin(p.PIN_26, Pull::None),
        Channel::new_pin(p.PIN_27, Pull::None),
    );

    // Motor on GPIO8 (slice 4 A), buzzer on GPIO10 (slice 5 A)
    let motor = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, PwmConfig::default());
    let buzzer = Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, PwmConfig::default());
    let actuator = PwmActuator::new(
        motor,
        buzzer,
        RpOutput(Output::new(p.PIN_3, Level::Low)),
        RpOutput(Output::new(p.PIN_5, Level::Low)),
        RpOutput(Output::new(p.PIN_6, Level::Low)),
    );

    // Buttons short to ground when pressed
    let buttons = PinButtons::new(
        RpInput(Input::new(p.PIN_14, Pull::Up)),
        RpInput(Input::new(p.PIN_15, Pull::Up)),
        RpInput(Input::new(p.PIN_16, Pull::Up)),
        RpInput(Input::new(p.PIN_17, Pull::Up)),
    );

    let eeprom = FlashSector::new(p.FLASH).into_eeprom();

    let mut display = TextDisplay::new(LogBackend::new(), config.timing.message_ms);
    if let Err(e) = display.splash() {
        warn!("Splash failed: {}", e);
    }
    Timer::after_millis(config.timing.splash_ms).await;

    let mut controller = Controller::new(
        config,
        eeprom,
        sensor,
        actuator,
        buttons,
        display,
        EmbassyClock,
    );
    controller.boot();
    info!("Controller ready, parameters: {}", controller.params());

    loop {
        controller.poll();
        Timer::after_millis(1).await;
    }
}
