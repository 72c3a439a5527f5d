//! PWM motor drive, RGB status indicator and alarm buzzer
//!
//! The motor output runs with `top = 255` so an 8-bit duty maps directly
//! onto the compare register. The buzzer slice is retuned per tone: the
//! divider and top are chosen from the system clock to hit the requested
//! frequency with a 50% duty square wave.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::types::U12F4;
use tacho_core::state::OperatingMode;
use tacho_core::traits::MotorActuator;
use tacho_hal::OutputPin;

/// Motor PWM counter top; one count per duty step
pub const MOTOR_PWM_TOP: u16 = 255;

/// Fixed buzzer clock divider, 125 MHz / 64 leaves room for tones down to ~30 Hz
const BUZZER_DIVIDER: u8 = 64;

/// Compute counter top for a tone at `frequency_hz` with divider `divider`
///
/// Returns `None` for a zero frequency or one the slice cannot reach.
pub fn tone_top(sys_hz: u32, divider: u8, frequency_hz: u32) -> Option<u16> {
    if frequency_hz == 0 || divider == 0 {
        return None;
    }
    let counts = sys_hz / (divider as u32) / frequency_hz;
    if counts < 2 {
        return None;
    }
    u16::try_from(counts - 1).ok()
}

pub struct PwmActuator<'d, R, G, B> {
    motor: Pwm<'d>,
    motor_config: PwmConfig,
    buzzer: Pwm<'d>,
    buzzer_config: PwmConfig,
    red: R,
    green: G,
    blue: B,
}

impl<'d, R: OutputPin, G: OutputPin, B: OutputPin> PwmActuator<'d, R, G, B> {
    /// Wrap configured PWM slices and indicator pins; all outputs start off
    pub fn new(motor: Pwm<'d>, buzzer: Pwm<'d>, red: R, green: G, blue: B) -> Self {
        let mut motor_config = PwmConfig::default();
        motor_config.top = MOTOR_PWM_TOP;
        motor_config.compare_a = 0;

        let mut buzzer_config = PwmConfig::default();
        buzzer_config.divider = U12F4::from_num(BUZZER_DIVIDER);
        buzzer_config.compare_a = 0;

        let mut this = Self {
            motor,
            motor_config,
            buzzer,
            buzzer_config,
            red,
            green,
            blue,
        };
        this.motor.set_config(&this.motor_config);
        this.buzzer.set_config(&this.buzzer_config);
        this.set_indicator(OperatingMode::Idle);
        this
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> MotorActuator for PwmActuator<'_, R, G, B> {
    fn set_motor_command(&mut self, duty: u8) {
        self.motor_config.compare_a = duty as u16;
        self.motor.set_config(&self.motor_config);
    }

    fn set_indicator(&mut self, mode: OperatingMode) {
        let (red, green, blue) = mode.indicator().channels();
        self.red.set_state(red);
        self.green.set_state(green);
        self.blue.set_state(blue);
    }

    fn set_alarm_sound(&mut self, on: bool, frequency_hz: u32) {
        let top = if on {
            tone_top(clk_sys_freq(), BUZZER_DIVIDER, frequency_hz)
        } else {
            None
        };

        match top {
            Some(top) => {
                self.buzzer_config.top = top;
                self.buzzer_config.compare_a = top / 2;
            }
            None => {
                #[cfg(feature = "defmt")]
                {
                    if on {
                        defmt::warn!("Buzzer cannot play {} Hz", frequency_hz);
                    }
                }
                self.buzzer_config.compare_a = 0;
            }
        }
        self.buzzer.set_config(&self.buzzer_config);
    }
}
