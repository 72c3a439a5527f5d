//! Menu and parameter-editing state machine
//!
//! The menu never touches hardware or storage itself. Each button press
//! yields a list of [`MenuAction`]s that the controller carries out, and the
//! controller reports save outcomes back so the unsaved flag stays truthful.

mod calibration;
mod machine;
mod notice;
mod screen;

pub use calibration::CalibrationStep;
pub use machine::{Actions, Menu, MenuAction, MenuContext, MenuPosition};
pub use notice::{Notice, PopupKind, MESSAGE_LEN};
pub use screen::{MenuItem, Screen};
