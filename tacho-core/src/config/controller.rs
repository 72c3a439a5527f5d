//! Fixed controller constants
//!
//! These are not operator-editable. The firmware build script generates a
//! [`ControllerConfig`] from `motor.toml`; host tests use [`ControllerConfig::DEFAULT`].

use super::Parameters;

/// Periods of the cooperative tasks and UI timers, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Sensor sampling and alarm evaluation period
    pub sense_interval_ms: u64,
    /// PID compute period (also the PID sample time)
    pub pid_interval_ms: u64,
    /// Button polling period
    pub input_poll_ms: u64,
    /// Minimum stable time before a button level is accepted
    pub debounce_ms: u64,
    /// Display refresh period
    pub display_interval_ms: u64,
    /// Autosave period while unsaved changes exist
    pub autosave_interval_ms: u64,
    /// Menu inactivity timeout
    pub menu_timeout_ms: u64,
    /// Continuous clear time before an alarm releases
    pub alarm_clear_ms: u64,
    /// Half-period of the intermittent alarm tone
    pub buzzer_toggle_ms: u64,
    /// How long transient messages stay on screen
    pub message_ms: u64,
    /// Boot splash duration
    pub splash_ms: u64,
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        sense_interval_ms: 10,
        pid_interval_ms: 10,
        input_poll_ms: 50,
        debounce_ms: 50,
        display_interval_ms: 100,
        autosave_interval_ms: 30_000,
        menu_timeout_ms: 30_000,
        alarm_clear_ms: 5_000,
        buzzer_toggle_ms: 500,
        message_ms: 2_000,
        splash_ms: 2_000,
    };
}

/// Everything the controller needs besides its collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    pub timing: Timing,
    /// Parameters written when storage is blank or a field is corrupt
    pub defaults: Parameters,
    /// ADC counts per full-scale range (1024 for 10-bit, 4096 for 12-bit)
    pub adc_resolution: u16,
    /// Fraction of current full scale that trips overcurrent
    pub overcurrent_threshold: f32,
    /// Multiple of speed full scale that trips overspeed
    pub overspeed_factor: f32,
    /// Setpoint change per Up/Down press on the status screen (rpm)
    pub setpoint_step: f32,
    /// Alarm tone frequency
    pub buzzer_frequency_hz: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ControllerConfig {
    pub const DEFAULT: ControllerConfig = ControllerConfig {
        timing: Timing::DEFAULT,
        defaults: Parameters::DEFAULT,
        adc_resolution: 1024,
        overcurrent_threshold: 0.9,
        overspeed_factor: 1.1,
        setpoint_step: 50.0,
        buzzer_frequency_hz: 2_000,
    };
}
