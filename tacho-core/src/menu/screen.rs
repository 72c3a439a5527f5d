//! Screen tree and item lists

use super::calibration::CalibrationStep;
use crate::config::Field;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Status display, no menu open
    #[default]
    None,
    Main,
    Settings,
    Pid,
    Calibration(CalibrationStep),
}

/// Selectable menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    RunStop,
    Settings,
    CurrentFullScale,
    SpeedFullScale,
    PidSettings,
    Reset,
    Calibration,
    Kp,
    Ki,
    Kd,
    Back,
}

const MAIN_ITEMS: &[MenuItem] = &[MenuItem::RunStop, MenuItem::Settings, MenuItem::Back];

const SETTINGS_ITEMS: &[MenuItem] = &[
    MenuItem::CurrentFullScale,
    MenuItem::SpeedFullScale,
    MenuItem::PidSettings,
    MenuItem::Reset,
    MenuItem::Calibration,
    MenuItem::Back,
];

const PID_ITEMS: &[MenuItem] = &[MenuItem::Kp, MenuItem::Ki, MenuItem::Kd, MenuItem::Back];

impl Screen {
    /// Items in display order; empty for screens without a list
    pub fn items(self) -> &'static [MenuItem] {
        match self {
            Screen::Main => MAIN_ITEMS,
            Screen::Settings => SETTINGS_ITEMS,
            Screen::Pid => PID_ITEMS,
            Screen::None | Screen::Calibration(_) => &[],
        }
    }

    /// Where Back leads
    pub fn parent(self) -> Screen {
        match self {
            Screen::None | Screen::Main => Screen::None,
            Screen::Settings => Screen::Main,
            Screen::Pid | Screen::Calibration(_) => Screen::Settings,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::None => "",
            Screen::Main => "MAIN MENU",
            Screen::Settings => "SETTINGS",
            Screen::Pid => "PID SETTINGS",
            Screen::Calibration(_) => "CALIBRATION",
        }
    }

    pub fn is_menu(self) -> bool {
        self != Screen::None
    }
}

impl MenuItem {
    /// Parameter edited by this item, if it is editable
    pub fn field(self) -> Option<Field> {
        match self {
            MenuItem::CurrentFullScale => Some(Field::CurrentFullScale),
            MenuItem::SpeedFullScale => Some(Field::SpeedFullScale),
            MenuItem::Kp => Some(Field::Kp),
            MenuItem::Ki => Some(Field::Ki),
            MenuItem::Kd => Some(Field::Kd),
            _ => None,
        }
    }

    pub fn is_editable(self) -> bool {
        self.field().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::RunStop => "Run/Stop",
            MenuItem::Settings => "Settings",
            MenuItem::PidSettings => "PID Settings",
            MenuItem::Reset => "Reset",
            MenuItem::Calibration => "Calibration",
            MenuItem::Back => "Back",
            editable => match editable.field() {
                Some(field) => field.label(),
                None => "",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_list_ends_with_back() {
        for screen in [Screen::Main, Screen::Settings, Screen::Pid] {
            assert_eq!(screen.items().last(), Some(&MenuItem::Back));
        }
    }

    #[test]
    fn test_parents() {
        assert_eq!(Screen::Pid.parent(), Screen::Settings);
        assert_eq!(Screen::Settings.parent(), Screen::Main);
        assert_eq!(Screen::Main.parent(), Screen::None);
        assert_eq!(
            Screen::Calibration(CalibrationStep::Done).parent(),
            Screen::Settings
        );
    }

    #[test]
    fn test_editable_items() {
        assert!(MenuItem::Kd.is_editable());
        assert!(!MenuItem::Reset.is_editable());
        assert_eq!(MenuItem::SpeedFullScale.label(), "Speed FS");
    }
}
