//! `tacho-hal` pin traits for embassy-rp GPIO

use embassy_rp::gpio::{Input, Output};
use tacho_hal::{InputPin, OutputPin};

/// Embassy input exposed as a [`tacho_hal::InputPin`]
pub struct RpInput<'d>(pub Input<'d>);

impl InputPin for RpInput<'_> {
    fn is_high(&mut self) -> bool {
        self.0.is_high()
    }
}

/// Embassy output exposed as a [`tacho_hal::OutputPin`]
pub struct RpOutput<'d>(pub Output<'d>);

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}
