//! Fault detection
//!
//! The alarm monitor turns each sensing result into a verdict. Entry is
//! immediate; release needs a continuously clear dwell window.

mod alarm;

pub use alarm::{AlarmKind, AlarmMonitor, AlarmVerdict};
