//! Menu state machine

use heapless::Vec;

use super::calibration::CalibrationStep;
use super::notice::{Notice, PopupKind};
use super::screen::{MenuItem, Screen};
use crate::config::{AdjustOutcome, Field, Parameters, Timing};
use crate::input::ButtonEvent;
use crate::state::OperatingMode;
use crate::traits::ButtonId;

/// Work the controller performs on behalf of the menu
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    StartMotor,
    StopMotor,
    /// Move the speed setpoint one step
    NudgeSetpoint { increase: bool },
    /// Persist the in-memory parameters
    Save,
    /// Push the in-memory gains to the PID
    UpdateTunings,
    /// Replace the in-memory parameters with the persisted ones
    Reload,
    /// Write and load the factory defaults
    RestoreDefaults,
    /// Take the current sensor zero point
    TareCurrent,
    /// Measure the loaded current against the overcurrent threshold
    MeasureLoad,
    Notify(Notice),
    ShowPopup(PopupKind),
    DismissPopup,
}

/// Actions from one menu step
pub type Actions = Vec<MenuAction, 8>;

/// What the menu needs from the rest of the controller for one step
pub struct MenuContext<'a> {
    /// Edited in place while a value is being adjusted
    pub params: &'a mut Parameters,
    pub mode: OperatingMode,
    pub now_ms: u64,
}

/// Read-only view of the menu for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuPosition {
    pub screen: Screen,
    pub selected: usize,
    pub editing: bool,
    pub unsaved: bool,
    pub popup: Option<PopupKind>,
}

impl MenuPosition {
    /// Highlighted item, if the screen has a list
    pub fn item(&self) -> Option<MenuItem> {
        self.screen.items().get(self.selected).copied()
    }

    /// Field being edited, if any
    pub fn editing_field(&self) -> Option<Field> {
        if self.editing {
            self.item().and_then(MenuItem::field)
        } else {
            None
        }
    }
}

fn push(actions: &mut Actions, action: MenuAction) {
    // No single step emits more than five actions
    let _ = actions.push(action);
}

/// Menu navigation, editing and unsaved-change tracking
#[derive(Debug, Clone)]
pub struct Menu {
    position: MenuPosition,
    last_activity_ms: u64,
    timeout_ms: u64,
}

impl Menu {
    pub fn new(timing: &Timing) -> Self {
        Self {
            position: MenuPosition::default(),
            last_activity_ms: 0,
            timeout_ms: timing.menu_timeout_ms,
        }
    }

    pub fn position(&self) -> MenuPosition {
        self.position
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.position.unsaved
    }

    /// Restart the inactivity timer, e.g. after boot
    pub fn touch(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
    }

    /// Record the outcome of a Save or RestoreDefaults
    pub fn save_finished(&mut self, ok: bool) {
        self.position.unsaved = !ok;
    }

    /// Handle one debounced button edge
    pub fn handle_button(&mut self, event: ButtonEvent, ctx: &mut MenuContext<'_>) -> Actions {
        let mut actions = Actions::new();
        if !event.pressed {
            return actions;
        }
        self.last_activity_ms = ctx.now_ms;

        if self.position.popup.is_some() {
            match event.id {
                ButtonId::Enter => return self.handle_popup_response(true),
                ButtonId::Back => return self.handle_popup_response(false),
                ButtonId::Up | ButtonId::Down => return actions,
            }
        }

        match event.id {
            ButtonId::Up | ButtonId::Down => {
                let increase = event.id == ButtonId::Up;
                match self.position.screen {
                    Screen::None => {
                        if ctx.mode == OperatingMode::Run {
                            push(&mut actions, MenuAction::NudgeSetpoint { increase });
                        }
                    }
                    Screen::Calibration(_) => {}
                    _ if self.position.editing => {
                        self.adjust_value(increase, ctx.params, &mut actions);
                    }
                    _ => self.navigate(increase),
                }
            }
            ButtonId::Enter => self.handle_selection(ctx, &mut actions),
            ButtonId::Back => self.handle_back(&mut actions),
        }
        actions
    }

    /// Move the selection; `up` goes to the previous item, wrapping
    pub fn navigate(&mut self, up: bool) {
        let count = self.position.screen.items().len();
        if count == 0 {
            return;
        }
        let selected = self.position.selected % count;
        self.position.selected = if up {
            (selected + count - 1) % count
        } else {
            (selected + 1) % count
        };
    }

    /// Enter on the current screen
    pub fn handle_selection(&mut self, ctx: &mut MenuContext<'_>, actions: &mut Actions) {
        match self.position.screen {
            Screen::None => self.enter(Screen::Main),
            Screen::Calibration(step) => {
                match step {
                    CalibrationStep::RemoveLoad => push(actions, MenuAction::TareCurrent),
                    CalibrationStep::ApplyFullLoad => push(actions, MenuAction::MeasureLoad),
                    CalibrationStep::Done => {}
                }
                match step.next() {
                    Some(next) => self.position.screen = Screen::Calibration(next),
                    None => self.enter(Screen::Settings),
                }
            }
            Screen::Main | Screen::Settings | Screen::Pid => {
                let Some(item) = self.position.item() else {
                    return;
                };
                match item {
                    MenuItem::RunStop => {
                        let action = if ctx.mode == OperatingMode::Run {
                            MenuAction::StopMotor
                        } else {
                            MenuAction::StartMotor
                        };
                        push(actions, action);
                    }
                    MenuItem::Settings => self.enter(Screen::Settings),
                    MenuItem::PidSettings => self.enter(Screen::Pid),
                    MenuItem::Calibration => {
                        self.enter(Screen::Calibration(CalibrationStep::RemoveLoad))
                    }
                    MenuItem::Reset => self.open_popup(PopupKind::ResetDefaults, actions),
                    MenuItem::Back => self.handle_back(actions),
                    MenuItem::CurrentFullScale
                    | MenuItem::SpeedFullScale
                    | MenuItem::Kp
                    | MenuItem::Ki
                    | MenuItem::Kd => {
                        if self.position.editing {
                            self.finish_edit(actions);
                        } else {
                            self.position.editing = true;
                            debug!("Editing {:?}", item);
                        }
                    }
                }
            }
        }
    }

    /// Back button (or the Back item)
    pub fn handle_back(&mut self, actions: &mut Actions) {
        match self.position.screen {
            Screen::None => {}
            Screen::Calibration(_) => self.enter(Screen::Settings),
            screen => {
                if self.position.unsaved {
                    self.open_popup(PopupKind::UnsavedChanges, actions);
                    return;
                }
                if self.position.editing {
                    self.finish_edit(actions);
                }
                self.enter(screen.parent());
            }
        }
    }

    /// Step the field under edit
    pub fn adjust_value(&mut self, increase: bool, params: &mut Parameters, actions: &mut Actions) {
        let Some(field) = self.position.editing_field() else {
            return;
        };
        match params.adjust(field, increase) {
            AdjustOutcome::Changed => self.position.unsaved = true,
            AdjustOutcome::AtLimit => push(actions, MenuAction::Notify(Notice::LimitReached)),
        }
    }

    /// Resolve the open popup
    pub fn handle_popup_response(&mut self, confirmed: bool) -> Actions {
        let mut actions = Actions::new();
        let Some(kind) = self.position.popup.take() else {
            return actions;
        };
        debug!("Popup {:?} confirmed={}", kind, confirmed);
        push(&mut actions, MenuAction::DismissPopup);

        match (kind, confirmed) {
            (PopupKind::UnsavedChanges, true) => {
                if self.position.editing {
                    self.finish_edit(&mut actions);
                } else {
                    push(&mut actions, MenuAction::Save);
                    push(&mut actions, MenuAction::UpdateTunings);
                }
                self.enter(self.position.screen.parent());
            }
            (PopupKind::UnsavedChanges, false) => {
                push(&mut actions, MenuAction::Reload);
                push(&mut actions, MenuAction::UpdateTunings);
                if self.position.editing {
                    self.position.editing = false;
                    push(&mut actions, MenuAction::Save);
                }
                self.position.unsaved = false;
                push(&mut actions, MenuAction::Notify(Notice::ChangesDiscarded));
            }
            (PopupKind::ResetDefaults, true) => {
                self.position.editing = false;
                push(&mut actions, MenuAction::RestoreDefaults);
            }
            (PopupKind::ResetDefaults, false) => {}
        }
        actions
    }

    /// Close the menu after a period without presses
    ///
    /// Never prompts: an edit in progress is saved and any popup dropped.
    pub fn check_timeout(&mut self, now_ms: u64) -> Actions {
        let mut actions = Actions::new();
        if !self.position.screen.is_menu() && self.position.popup.is_none() {
            return actions;
        }
        if now_ms.saturating_sub(self.last_activity_ms) < self.timeout_ms {
            return actions;
        }

        debug!("Menu timeout");
        if self.position.popup.take().is_some() {
            push(&mut actions, MenuAction::DismissPopup);
        }
        if self.position.editing {
            self.finish_edit(&mut actions);
        }
        self.enter(Screen::None);
        actions
    }

    fn finish_edit(&mut self, actions: &mut Actions) {
        let field = self.position.editing_field();
        self.position.editing = false;
        push(actions, MenuAction::Save);
        if field.is_some_and(Field::is_gain) {
            push(actions, MenuAction::UpdateTunings);
        }
    }

    fn open_popup(&mut self, kind: PopupKind, actions: &mut Actions) {
        self.position.popup = Some(kind);
        push(actions, MenuAction::ShowPopup(kind));
    }

    fn enter(&mut self, screen: Screen) {
        if screen != self.position.screen {
            debug!("Screen {:?} -> {:?}", self.position.screen, screen);
        }
        self.position.screen = screen;
        self.position.selected = 0;
        self.position.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn press(id: ButtonId) -> ButtonEvent {
        ButtonEvent { id, pressed: true }
    }

    struct Rig {
        menu: Menu,
        params: Parameters,
        mode: OperatingMode,
        now_ms: u64,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                menu: Menu::new(&Timing::DEFAULT),
                params: Parameters::DEFAULT,
                mode: OperatingMode::Idle,
                now_ms: 0,
            }
        }

        fn press(&mut self, id: ButtonId) -> Actions {
            self.now_ms += 100;
            let mut ctx = MenuContext {
                params: &mut self.params,
                mode: self.mode,
                now_ms: self.now_ms,
            };
            self.menu.handle_button(press(id), &mut ctx)
        }

        fn screen(&self) -> Screen {
            self.menu.position().screen
        }

        fn item(&self) -> Option<MenuItem> {
            self.menu.position().item()
        }

        /// Walk from the status screen to a Settings item
        fn open_settings_item(&mut self, item: MenuItem) {
            self.press(ButtonId::Enter);
            self.press(ButtonId::Down);
            self.press(ButtonId::Enter);
            while self.item() != Some(item) {
                self.press(ButtonId::Down);
            }
        }
    }

    #[test]
    fn test_enter_opens_main_on_first_item() {
        let mut rig = Rig::new();
        rig.press(ButtonId::Enter);
        assert_eq!(rig.screen(), Screen::Main);
        assert_eq!(rig.item(), Some(MenuItem::RunStop));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut rig = Rig::new();
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Up);
        assert_eq!(rig.item(), Some(MenuItem::Back));
        rig.press(ButtonId::Down);
        assert_eq!(rig.item(), Some(MenuItem::RunStop));
    }

    #[test]
    fn test_run_stop_follows_mode() {
        let mut rig = Rig::new();
        rig.press(ButtonId::Enter);
        assert_eq!(rig.press(ButtonId::Enter).as_slice(), &[MenuAction::StartMotor]);
        rig.mode = OperatingMode::Run;
        assert_eq!(rig.press(ButtonId::Enter).as_slice(), &[MenuAction::StopMotor]);
    }

    #[test]
    fn test_status_screen_nudges_only_in_run() {
        let mut rig = Rig::new();
        assert!(rig.press(ButtonId::Up).is_empty());
        rig.mode = OperatingMode::Run;
        assert_eq!(
            rig.press(ButtonId::Down).as_slice(),
            &[MenuAction::NudgeSetpoint { increase: false }]
        );
        assert_eq!(rig.screen(), Screen::None);
    }

    #[test]
    fn test_edit_exit_saves() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::CurrentFullScale);
        rig.press(ButtonId::Enter);
        assert!(rig.menu.position().editing);

        rig.press(ButtonId::Up);
        assert_eq!(rig.params.current_full_scale, 31.0);
        assert!(rig.menu.has_unsaved_changes());

        let actions = rig.press(ButtonId::Enter);
        assert_eq!(actions.as_slice(), &[MenuAction::Save]);
        assert!(!rig.menu.position().editing);

        rig.menu.save_finished(true);
        assert!(!rig.menu.has_unsaved_changes());
    }

    #[test]
    fn test_gain_edit_exit_updates_tunings() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::PidSettings);
        rig.press(ButtonId::Enter);
        assert_eq!(rig.screen(), Screen::Pid);
        rig.press(ButtonId::Down);
        assert_eq!(rig.item(), Some(MenuItem::Ki));

        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Up);
        assert_eq!(rig.params.ki, 0.1);
        let actions = rig.press(ButtonId::Enter);
        assert_eq!(
            actions.as_slice(),
            &[MenuAction::Save, MenuAction::UpdateTunings]
        );
    }

    #[test]
    fn test_limit_notice_without_change() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::SpeedFullScale);
        rig.press(ButtonId::Enter);

        let actions = rig.press(ButtonId::Up);
        assert_eq!(
            actions.as_slice(),
            &[MenuAction::Notify(Notice::LimitReached)]
        );
        assert_eq!(rig.params.speed_full_scale, 500);
        assert!(!rig.menu.has_unsaved_changes());
    }

    #[test]
    fn test_back_with_unsaved_prompts_then_saves_and_leaves() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::CurrentFullScale);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Down);

        let actions = rig.press(ButtonId::Back);
        assert_eq!(
            actions.as_slice(),
            &[MenuAction::ShowPopup(PopupKind::UnsavedChanges)]
        );
        assert_eq!(rig.screen(), Screen::Settings);

        // Up/Down are swallowed while the popup is open
        assert!(rig.press(ButtonId::Up).is_empty());
        assert_eq!(rig.params.current_full_scale, 29.0);

        let actions = rig.press(ButtonId::Enter);
        assert_eq!(
            actions.as_slice(),
            &[MenuAction::DismissPopup, MenuAction::Save]
        );
        assert_eq!(rig.screen(), Screen::Main);
        assert_eq!(rig.menu.position().popup, None);
    }

    #[test]
    fn test_confirm_during_gain_edit_retunes_once() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::PidSettings);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Enter);
        assert_eq!(rig.item(), Some(MenuItem::Kp));
        rig.press(ButtonId::Up);
        rig.press(ButtonId::Back);

        let actions = rig.press(ButtonId::Enter);
        assert_eq!(
            actions.as_slice(),
            &[
                MenuAction::DismissPopup,
                MenuAction::Save,
                MenuAction::UpdateTunings
            ]
        );
        assert_eq!(rig.screen(), Screen::Settings);
    }

    #[test]
    fn test_confirm_outside_edit_saves_and_retunes() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::CurrentFullScale);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Up);
        // Leave the edit with the save failing, so the changes stay unsaved
        rig.press(ButtonId::Enter);
        rig.menu.save_finished(false);
        assert!(rig.menu.has_unsaved_changes());

        rig.press(ButtonId::Back);
        let actions = rig.press(ButtonId::Enter);
        assert_eq!(
            actions.as_slice(),
            &[
                MenuAction::DismissPopup,
                MenuAction::Save,
                MenuAction::UpdateTunings
            ]
        );
    }

    #[test]
    fn test_popup_reject_reloads_and_stays() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::CurrentFullScale);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Down);
        rig.press(ButtonId::Back);

        let actions = rig.press(ButtonId::Back);
        assert_eq!(actions[0], MenuAction::DismissPopup);
        assert_eq!(actions[1], MenuAction::Reload);
        assert!(actions.contains(&MenuAction::Save));
        assert_eq!(rig.screen(), Screen::Settings);
        assert!(!rig.menu.position().editing);
        assert!(!rig.menu.has_unsaved_changes());
    }

    #[test]
    fn test_reset_popup() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::Reset);
        let actions = rig.press(ButtonId::Enter);
        assert_eq!(
            actions.as_slice(),
            &[MenuAction::ShowPopup(PopupKind::ResetDefaults)]
        );
        let actions = rig.press(ButtonId::Enter);
        assert_eq!(
            actions.as_slice(),
            &[MenuAction::DismissPopup, MenuAction::RestoreDefaults]
        );

        rig.press(ButtonId::Enter);
        let actions = rig.press(ButtonId::Back);
        assert_eq!(actions.as_slice(), &[MenuAction::DismissPopup]);
    }

    #[test]
    fn test_calibration_wizard() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::Calibration);
        rig.press(ButtonId::Enter);
        assert_eq!(
            rig.screen(),
            Screen::Calibration(CalibrationStep::RemoveLoad)
        );

        assert_eq!(rig.press(ButtonId::Enter).as_slice(), &[MenuAction::TareCurrent]);
        assert_eq!(rig.press(ButtonId::Enter).as_slice(), &[MenuAction::MeasureLoad]);
        assert_eq!(rig.screen(), Screen::Calibration(CalibrationStep::Done));
        assert!(rig.press(ButtonId::Enter).is_empty());
        assert_eq!(rig.screen(), Screen::Settings);
    }

    #[test]
    fn test_calibration_back_aborts() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::Calibration);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Back);
        assert_eq!(rig.screen(), Screen::Settings);
        assert_eq!(rig.item(), Some(MenuItem::CurrentFullScale));
    }

    #[test]
    fn test_timeout_saves_edit_without_prompt() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::CurrentFullScale);
        rig.press(ButtonId::Enter);
        rig.press(ButtonId::Up);

        let last = rig.now_ms;
        assert!(rig.menu.check_timeout(last + 29_999).is_empty());

        let actions = rig.menu.check_timeout(last + 30_000);
        assert_eq!(actions.as_slice(), &[MenuAction::Save]);
        let position = rig.menu.position();
        assert_eq!(position.screen, Screen::None);
        assert_eq!(position.popup, None);
        assert!(!position.editing);
    }

    #[test]
    fn test_timeout_drops_popup() {
        let mut rig = Rig::new();
        rig.open_settings_item(MenuItem::Reset);
        rig.press(ButtonId::Enter);
        let actions = rig.menu.check_timeout(rig.now_ms + 30_000);
        assert_eq!(actions.as_slice(), &[MenuAction::DismissPopup]);
        assert_eq!(rig.screen(), Screen::None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut rig = Rig::new();
        let mut ctx = MenuContext {
            params: &mut rig.params,
            mode: OperatingMode::Idle,
            now_ms: 10,
        };
        let event = ButtonEvent {
            id: ButtonId::Enter,
            pressed: false,
        };
        assert!(rig.menu.handle_button(event, &mut ctx).is_empty());
        assert_eq!(rig.menu.position().screen, Screen::None);
    }

    fn any_button() -> impl Strategy<Value = ButtonId> {
        prop_oneof![
            Just(ButtonId::Up),
            Just(ButtonId::Down),
            Just(ButtonId::Enter),
            Just(ButtonId::Back),
        ]
    }

    proptest! {
        #[test]
        fn prop_navigation_is_a_cycle(
            screen in prop_oneof![Just(Screen::Main), Just(Screen::Settings), Just(Screen::Pid)],
            start in 0usize..6,
            up in any::<bool>(),
        ) {
            let mut menu = Menu::new(&Timing::DEFAULT);
            menu.enter(screen);
            let count = screen.items().len();
            menu.position.selected = start % count;
            let before = menu.position().selected;
            for _ in 0..count {
                menu.navigate(up);
            }
            prop_assert_eq!(menu.position().selected, before);
        }

        #[test]
        fn prop_leaving_edit_always_saves(buttons in proptest::collection::vec(any_button(), 0..80)) {
            let mut rig = Rig::new();
            for id in buttons {
                let before = rig.menu.position();
                let actions = rig.press(id);
                let after = rig.menu.position();

                if before.editing && !after.editing {
                    prop_assert!(actions.contains(&MenuAction::Save));
                    if before.editing_field().is_some_and(Field::is_gain) {
                        prop_assert!(actions.contains(&MenuAction::UpdateTunings));
                    }
                }
                prop_assert!(rig.params.is_valid());
                if after.screen.is_menu() && !after.screen.items().is_empty() {
                    prop_assert!(after.selected < after.screen.items().len());
                }
            }
        }
    }
}
