//! Configuration types
//!
//! [`Parameters`] are the operator-editable, persisted settings.
//! [`ControllerConfig`] holds the fixed timing and threshold constants that
//! the firmware generates from `motor.toml` at build time.

mod controller;
mod params;

pub use controller::{ControllerConfig, Timing};
pub use params::{
    AdjustOutcome, Field, Parameters, CURRENT_FULL_SCALE_MAX, CURRENT_FULL_SCALE_MIN, GAIN_MAX,
    GAIN_MIN, SPEED_FULL_SCALE_MAX, SPEED_FULL_SCALE_MIN,
};
