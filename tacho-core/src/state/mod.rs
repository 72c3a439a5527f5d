//! Operating-mode state machine
//!
//! Idle, Run and Alarm. Operator commands move between Idle and Run; only
//! the alarm monitor moves into and out of Alarm.

mod events;
mod machine;
mod mode;

pub use events::ModeEvent;
pub use machine::OperatingMode;
pub use mode::{ModeError, ModeMachine, Transition};
