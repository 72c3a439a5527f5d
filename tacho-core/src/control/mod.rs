//! Closed-loop speed control

pub mod pid;

pub use pid::{ControlSignal, PidGains, SpeedPid, OUTPUT_MAX, OUTPUT_MIN};
