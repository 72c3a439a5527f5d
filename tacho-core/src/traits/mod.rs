//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and the
//! board-specific sensor, actuator, button and display implementations.

pub mod actuator;
pub mod buttons;
pub mod display;
pub mod sensor;

pub use actuator::{IndicatorColor, MotorActuator};
pub use buttons::{ButtonId, ButtonPanel, PinButtons};
pub use display::{DisplayError, Snapshot, StatusDisplay};
pub use sensor::{MotorSensor, SensorError};
