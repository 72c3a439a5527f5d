//! Screen rendering
//!
//! Builds the 20x4 layout for each UI state from a controller snapshot.
//!
//! ```text
//! status screen          menu screen            calibration
//! RUN                    SETTINGS          *    CALIBRATION
//! Spd  287/ 300rpm       > Current FS   30.0A   Remove motor load
//! Cur  12.4A  FS 30A       Speed FS    500rpm   Enter: set zero
//! Out 142  55%             PID Settings         Step 1/3
//! ```

use heapless::String;
use tacho_core::config::{Field, Parameters};
use tacho_core::menu::{CalibrationStep, MenuItem, MenuPosition, Screen as MenuScreen};
use tacho_core::traits::Snapshot;

use crate::screen::{line, Line, Screen, SCREEN_ROWS};

/// Menu rows available below the title
const MENU_ROWS: usize = SCREEN_ROWS - 1;

/// Format a parameter value with its unit
fn field_value(params: &Parameters, field: Field) -> String<10> {
    let mut out = String::new();
    let text = match field {
        Field::CurrentFullScale => line(format_args!("{:.1}{}", params.current_full_scale, field.unit())),
        Field::SpeedFullScale => line(format_args!("{}{}", params.speed_full_scale, field.unit())),
        gain => line(format_args!("{:.1}", params.get(gain))),
    };
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// First item shown so that `selected` stays visible
fn window_start(selected: usize, count: usize) -> usize {
    if count <= MENU_ROWS {
        0
    } else {
        selected.saturating_sub(MENU_ROWS - 1).min(count - MENU_ROWS)
    }
}

/// Screen renderer for the controller UI
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub const fn new() -> Self {
        Self
    }

    /// Render the splash screen shown during startup
    pub fn render_splash(&self, screen: &mut Screen) {
        screen.clear();
        screen.set_line(1, "       TACHO");
        screen.set_line(2, " Motor Speed Control");
    }

    /// Render whichever screen the snapshot calls for
    pub fn render(&self, snapshot: &Snapshot, screen: &mut Screen) {
        match snapshot.menu.screen {
            MenuScreen::None => self.render_status(snapshot, screen),
            MenuScreen::Calibration(step) => self.render_calibration(step, screen),
            MenuScreen::Main | MenuScreen::Settings | MenuScreen::Pid => {
                self.render_menu(&snapshot.menu, &snapshot.params, screen)
            }
        }
    }

    /// Render the status screen
    pub fn render_status(&self, snapshot: &Snapshot, screen: &mut Screen) {
        let header = match snapshot.alarm {
            Some(kind) => line(format_args!("{:<5} {}", snapshot.mode.label(), kind.label())),
            None => line(format_args!("{}", snapshot.mode.label())),
        };
        screen.set_line(0, &header);

        let setpoint = snapshot.control.setpoint;
        let speed = match snapshot.measurement {
            Some(m) => line(format_args!("Spd {:>4.0}/{:>4.0}rpm", m.speed_rpm, setpoint)),
            None => line(format_args!("Spd ----/{:>4.0}rpm", setpoint)),
        };
        screen.set_line(1, &speed);

        let full_scale = snapshot.params.current_full_scale;
        let current = match snapshot.measurement {
            Some(m) => line(format_args!("Cur {:>5.1}A  FS{:>3.0}A", m.current_a, full_scale)),
            None => line(format_args!("Cur  ---.-A  FS{:>3.0}A", full_scale)),
        };
        screen.set_line(2, &current);

        let output = snapshot.control.output;
        let percent = output as u32 * 100 / 255;
        screen.set_line(3, &line(format_args!("Out {:>3} {:>3}%", output, percent)));
        screen.set_highlight(None);
    }

    /// Render a menu list with the selection highlighted
    pub fn render_menu(&self, menu: &MenuPosition, params: &Parameters, screen: &mut Screen) {
        let marker = if menu.unsaved { "*" } else { "" };
        screen.set_line(0, &line(format_args!("{:<19}{}", menu.screen.title(), marker)));

        let items = menu.screen.items();
        let start = window_start(menu.selected, items.len());
        let mut highlight = None;

        for slot in 0..MENU_ROWS {
            let row = slot + 1;
            let index = start + slot;
            let Some(item) = items.get(index).copied() else {
                screen.set_line(row, "");
                continue;
            };

            let selected = index == menu.selected;
            if selected {
                highlight = Some(row);
            }
            screen.set_line(row, &self.item_line(item, params, selected, selected && menu.editing));
        }
        screen.set_highlight(highlight);
    }

    fn item_line(
        &self,
        item: MenuItem,
        params: &Parameters,
        selected: bool,
        editing: bool,
    ) -> Line {
        let cursor = if selected { ">" } else { " " };
        match item.field() {
            Some(field) => {
                let value = field_value(params, field);
                if editing {
                    line(format_args!("{} {:<10}[{:>6}]", cursor, item.label(), value.as_str()))
                } else {
                    line(format_args!("{} {:<10}{:>8}", cursor, item.label(), value.as_str()))
                }
            }
            None => line(format_args!("{} {}", cursor, item.label())),
        }
    }

    /// Render one calibration wizard step
    pub fn render_calibration(&self, step: CalibrationStep, screen: &mut Screen) {
        let (first, second) = step.prompt();
        let number = match step {
            CalibrationStep::RemoveLoad => 1,
            CalibrationStep::ApplyFullLoad => 2,
            CalibrationStep::Done => 3,
        };
        screen.set_line(0, MenuScreen::Calibration(step).title());
        screen.set_line(1, first);
        screen.set_line(2, second);
        screen.set_line(3, &line(format_args!("Step {}/3", number)));
        screen.set_highlight(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::control::ControlSignal;
    use tacho_core::safety::AlarmKind;
    use tacho_core::sensing::Measurement;
    use tacho_core::state::OperatingMode;

    fn snapshot() -> Snapshot {
        Snapshot {
            now_ms: 0,
            mode: OperatingMode::Run,
            alarm: None,
            params: Parameters::DEFAULT,
            measurement: Some(Measurement {
                speed_rpm: 287.4,
                current_a: 12.4,
                overcurrent: false,
            }),
            control: ControlSignal {
                setpoint: 300.0,
                measured: 287.4,
                output: 142,
            },
            menu: MenuPosition::default(),
        }
    }

    #[test]
    fn test_status_screen() {
        let mut screen = Screen::new();
        Renderer::new().render(&snapshot(), &mut screen);
        assert_eq!(screen.get_line(0), Some("RUN"));
        assert_eq!(screen.get_line(1), Some("Spd  287/ 300rpm"));
        assert_eq!(screen.get_line(2), Some("Cur  12.4A  FS 30A"));
        assert_eq!(screen.get_line(3), Some("Out 142  55%"));
    }

    #[test]
    fn test_alarm_header() {
        let mut snap = snapshot();
        snap.mode = OperatingMode::Alarm;
        snap.alarm = Some(AlarmKind::SensorFault);
        snap.measurement = None;

        let mut screen = Screen::new();
        Renderer::new().render(&snap, &mut screen);
        assert_eq!(screen.get_line(0), Some("ALARM SENSOR FAULT"));
        assert_eq!(screen.get_line(1), Some("Spd ----/ 300rpm"));
    }

    #[test]
    fn test_menu_window_follows_selection() {
        let mut snap = snapshot();
        snap.menu = MenuPosition {
            screen: MenuScreen::Settings,
            selected: 4,
            editing: false,
            unsaved: true,
            popup: None,
        };

        let mut screen = Screen::new();
        Renderer::new().render(&snap, &mut screen);
        assert_eq!(screen.get_line(0), Some("SETTINGS           *"));
        assert_eq!(screen.get_line(1), Some("  PID Settings"));
        assert_eq!(screen.get_line(3), Some("> Calibration"));
        assert_eq!(screen.highlight(), Some(3));
    }

    #[test]
    fn test_editing_value_is_bracketed() {
        let mut snap = snapshot();
        snap.menu = MenuPosition {
            screen: MenuScreen::Settings,
            selected: 0,
            editing: true,
            unsaved: false,
            popup: None,
        };

        let mut screen = Screen::new();
        Renderer::new().render(&snap, &mut screen);
        assert_eq!(screen.get_line(1), Some("> Current FS[ 30.0A]"));
        assert_eq!(screen.get_line(2), Some("  Speed FS    500rpm"));
    }

    #[test]
    fn test_calibration_prompt() {
        let mut screen = Screen::new();
        Renderer::new().render_calibration(CalibrationStep::ApplyFullLoad, &mut screen);
        assert_eq!(screen.get_line(1), Some("Apply full load"));
        assert_eq!(screen.get_line(3), Some("Step 2/3"));
    }
}
