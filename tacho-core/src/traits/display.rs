//! Operator display trait
//!
//! The controller hands the display a [`Snapshot`] of everything it may
//! show; layout and text formatting stay on the display side.

use crate::config::Parameters;
use crate::control::ControlSignal;
use crate::menu::MenuPosition;
use crate::safety::AlarmKind;
use crate::sensing::Measurement;
use crate::state::OperatingMode;

/// Errors that can occur with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus or link failure
    Communication,
    /// Drawing outside the visible area
    InvalidCoordinates,
    /// Display has not been initialized
    NotInitialized,
}

/// Read-only view of controller state for one display refresh
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub now_ms: u64,
    pub mode: OperatingMode,
    pub alarm: Option<AlarmKind>,
    pub params: Parameters,
    /// Latest good measurement, if any
    pub measurement: Option<Measurement>,
    pub control: ControlSignal,
    pub menu: MenuPosition,
}

/// Operator-facing display
pub trait StatusDisplay {
    /// Redraw from a state snapshot
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), DisplayError>;

    /// Show a transient one-line message
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Overlay a popup until dismissed
    fn show_popup(
        &mut self,
        title: &str,
        text: &str,
        needs_confirmation: bool,
    ) -> Result<(), DisplayError>;

    /// Remove any popup overlay
    fn dismiss_popup(&mut self) -> Result<(), DisplayError>;
}
