//! Controller constants generated from motor.toml

use tacho_core::config::{ControllerConfig, Parameters, Timing};

include!(concat!(env!("OUT_DIR"), "/motor_config.rs"));
