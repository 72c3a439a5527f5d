//! Transient messages and confirmation popups

use core::fmt::Write;

use heapless::String;

/// Width of one display line
pub const MESSAGE_LEN: usize = 20;

/// One-line transient message
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    LimitReached,
    Saved,
    SaveFailed,
    ChangesDiscarded,
    DefaultsRestored,
    MotorStarted,
    MotorStopped,
    AlarmActive,
    ZeroSet,
    SensorFault,
    /// Loaded current below the overcurrent threshold (amps)
    LoadOk(f32),
    LoadNearLimit,
}

impl Notice {
    pub fn text(&self) -> String<MESSAGE_LEN> {
        let mut text = String::new();
        // Every variant fits MESSAGE_LEN; overflow would only truncate
        let _ = match self {
            Notice::LimitReached => text.push_str("Limit reached"),
            Notice::Saved => text.push_str("Saved"),
            Notice::SaveFailed => text.push_str("Save failed"),
            Notice::ChangesDiscarded => text.push_str("Changes discarded"),
            Notice::DefaultsRestored => text.push_str("Defaults restored"),
            Notice::MotorStarted => text.push_str("Motor started"),
            Notice::MotorStopped => text.push_str("Motor stopped"),
            Notice::AlarmActive => text.push_str("Alarm active"),
            Notice::ZeroSet => text.push_str("Zero set"),
            Notice::SensorFault => text.push_str("Sensor fault"),
            Notice::LoadOk(amps) => write!(text, "Load OK {:.1}A", amps).map_err(|_| ()),
            Notice::LoadNearLimit => text.push_str("Load near limit"),
        };
        text
    }
}

/// Popups that wait for Enter (confirm) or Back (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PopupKind {
    UnsavedChanges,
    ResetDefaults,
}

impl PopupKind {
    pub fn title(self) -> &'static str {
        match self {
            PopupKind::UnsavedChanges => "Unsaved changes",
            PopupKind::ResetDefaults => "Reset",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            PopupKind::UnsavedChanges => "Save changes?",
            PopupKind::ResetDefaults => "Restore defaults?",
        }
    }

    pub fn needs_confirmation(self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_report_formats_one_decimal() {
        assert_eq!(Notice::LoadOk(12.34).text().as_str(), "Load OK 12.3A");
    }

    #[test]
    fn test_texts_fit_one_line() {
        let all = [
            Notice::LimitReached,
            Notice::Saved,
            Notice::SaveFailed,
            Notice::ChangesDiscarded,
            Notice::DefaultsRestored,
            Notice::MotorStarted,
            Notice::MotorStopped,
            Notice::AlarmActive,
            Notice::ZeroSet,
            Notice::SensorFault,
            Notice::LoadOk(49.9),
            Notice::LoadNearLimit,
        ];
        for notice in all {
            assert!(!notice.text().is_empty());
        }
    }
}
