//! Cooperative controller loop
//!
//! The controller owns every component and collaborator. Each call to
//! [`Controller::poll`] runs whatever periodic work is due, in a fixed order:
//!
//! 1. Sensing and alarm evaluation
//! 2. Operating-mode follow-up on the alarm verdict
//! 3. PID compute (Run only)
//! 4. Button polling and the menu
//! 5. Menu timeout and autosave
//! 6. Alarm tone and display refresh
//!
//! Nothing blocks; the caller decides how often to poll.

use tacho_hal::Eeprom;

use crate::clock::{Cadence, Clock};
use crate::config::{ControllerConfig, Parameters};
use crate::control::{ControlSignal, PidGains, SpeedPid};
use crate::input::ButtonScanner;
use crate::menu::{Actions, Menu, MenuAction, MenuContext, MenuPosition, Notice, PopupKind};
use crate::safety::{AlarmKind, AlarmMonitor};
use crate::sensing::{is_overcurrent, Sensing};
use crate::state::{ModeError, ModeMachine, OperatingMode, Transition};
use crate::storage::ParameterStore;
use crate::traits::{ButtonPanel, MotorActuator, MotorSensor, Snapshot, StatusDisplay};

/// Central coordinator for sensing, safety, control and the operator UI
pub struct Controller<E, S, A, B, D, C> {
    config: ControllerConfig,
    store: ParameterStore<E>,
    params: Parameters,
    sensing: Sensing,
    alarm: AlarmMonitor,
    mode: ModeMachine,
    pid: SpeedPid,
    input: ButtonScanner,
    menu: Menu,

    sensor: S,
    actuator: A,
    buttons: B,
    display: D,
    clock: C,

    sense_cadence: Cadence,
    pid_cadence: Cadence,
    display_cadence: Cadence,
    autosave_cadence: Cadence,
    buzzer_cadence: Cadence,
    buzzer_on: bool,
}

impl<E, S, A, B, D, C> Controller<E, S, A, B, D, C>
where
    E: Eeprom,
    S: MotorSensor,
    A: MotorActuator,
    B: ButtonPanel,
    D: StatusDisplay,
    C: Clock,
{
    pub fn new(
        config: ControllerConfig,
        eeprom: E,
        sensor: S,
        actuator: A,
        buttons: B,
        display: D,
        clock: C,
    ) -> Self {
        let timing = config.timing;
        let params = config.defaults;
        Self {
            config,
            store: ParameterStore::new(eeprom, config.defaults),
            params,
            sensing: Sensing::new(&config),
            alarm: AlarmMonitor::new(&config),
            mode: ModeMachine::new(),
            pid: SpeedPid::new(PidGains::from_params(&params), timing.pid_interval_ms),
            input: ButtonScanner::new(&timing),
            menu: Menu::new(&timing),
            sensor,
            actuator,
            buttons,
            display,
            clock,
            sense_cadence: Cadence::new(timing.sense_interval_ms),
            pid_cadence: Cadence::new(timing.pid_interval_ms),
            display_cadence: Cadence::new(timing.display_interval_ms),
            autosave_cadence: Cadence::new(timing.autosave_interval_ms),
            buzzer_cadence: Cadence::new(timing.buzzer_toggle_ms),
            buzzer_on: false,
        }
    }

    /// Load parameters and put every output in its idle state
    pub fn boot(&mut self) {
        let now = self.clock.now_ms();

        self.params = self.store.boot();
        self.pid.update_tunings(PidGains::from_params(&self.params));
        self.pid.clamp_setpoint(self.params.speed_full_scale);

        self.actuator.set_motor_command(0);
        self.actuator.set_indicator(self.mode.mode());
        self.actuator
            .set_alarm_sound(false, self.config.buzzer_frequency_hz);
        self.menu.touch(now);

        info!("Controller ready: {:?}", self.params);
    }

    /// Run one loop iteration
    pub fn poll(&mut self) {
        let now = self.clock.now_ms();

        if self.sense_cadence.due(now) {
            self.sense(now);
        }

        if self.pid_cadence.due(now) && self.mode.mode().motor_enabled() {
            self.control();
        }

        self.handle_input(now);

        let actions = self.menu.check_timeout(now);
        self.apply(actions, now);

        if self.autosave_cadence.due(now) && self.menu.has_unsaved_changes() {
            debug!("Autosave");
            self.persist();
        }

        if self.mode.mode().is_alarm() && self.buzzer_cadence.due(now) {
            self.buzzer_on = !self.buzzer_on;
            self.actuator
                .set_alarm_sound(self.buzzer_on, self.config.buzzer_frequency_hz);
        }

        if self.display_cadence.due(now) {
            let snapshot = self.snapshot_at(now);
            if let Err(e) = self.display.render(&snapshot) {
                warn!("Display refresh failed: {:?}", e);
            }
        }
    }

    fn sense(&mut self, now: u64) {
        let reading = self.sensing.sample(&mut self.sensor, &self.params);
        let verdict = self.alarm.evaluate(&reading, &self.params, now);
        if let Some(transition) = self.mode.on_alarm(verdict) {
            self.on_transition(transition, now);
        }
    }

    fn control(&mut self) {
        let Some(measurement) = self.sensing.last() else {
            return;
        };
        let output = self.pid.compute(measurement.speed_rpm);
        self.actuator.set_motor_command(output);
    }

    fn handle_input(&mut self, now: u64) {
        let events = self.input.poll(&mut self.buttons, now);
        for event in events {
            let actions = {
                let mut ctx = MenuContext {
                    params: &mut self.params,
                    mode: self.mode.mode(),
                    now_ms: now,
                };
                self.menu.handle_button(event, &mut ctx)
            };
            self.apply(actions, now);
        }
    }

    /// Answer the open popup, as if Enter (confirm) or Back (reject) was pressed
    pub fn handle_popup_response(&mut self, confirmed: bool) {
        let now = self.clock.now_ms();
        self.menu.touch(now);
        let actions = self.menu.handle_popup_response(confirmed);
        self.apply(actions, now);
    }

    /// Set the speed target directly; returns the clamped value
    pub fn set_speed_setpoint(&mut self, rpm: f32) -> f32 {
        self.pid.set_setpoint(rpm, self.params.speed_full_scale)
    }

    fn apply(&mut self, actions: Actions, now: u64) {
        for action in actions {
            match action {
                MenuAction::StartMotor => match self.mode.start(self.alarm.active()) {
                    Ok(t) => {
                        self.on_transition(t, now);
                        self.notify(Notice::MotorStarted);
                    }
                    Err(ModeError::AlarmActive) => self.notify(Notice::AlarmActive),
                    Err(ModeError::AlreadyInMode) => {}
                },
                MenuAction::StopMotor => match self.mode.stop(self.alarm.active()) {
                    Ok(t) => {
                        self.on_transition(t, now);
                        self.notify(Notice::MotorStopped);
                    }
                    Err(ModeError::AlarmActive) => self.notify(Notice::AlarmActive),
                    Err(ModeError::AlreadyInMode) => {}
                },
                MenuAction::NudgeSetpoint { increase } => {
                    let setpoint = self.pid.adjust_setpoint(
                        increase,
                        self.config.setpoint_step,
                        self.params.speed_full_scale,
                    );
                    debug!("Setpoint {}", setpoint);
                }
                MenuAction::Save => {
                    let notice = if self.persist() {
                        Notice::Saved
                    } else {
                        Notice::SaveFailed
                    };
                    self.notify(notice);
                }
                MenuAction::UpdateTunings => {
                    self.pid.update_tunings(PidGains::from_params(&self.params));
                }
                MenuAction::Reload => {
                    self.params = self.store.load_or_default();
                }
                MenuAction::RestoreDefaults => self.restore_defaults(),
                MenuAction::TareCurrent => {
                    let notice = match self.sensing.tare_current(&mut self.sensor) {
                        Ok(_) => Notice::ZeroSet,
                        Err(e) => {
                            warn!("Tare failed: {:?}", e);
                            Notice::SensorFault
                        }
                    };
                    self.notify(notice);
                }
                MenuAction::MeasureLoad => {
                    let notice = match self.sensing.read_current(&mut self.sensor, &self.params) {
                        Ok(amps)
                            if is_overcurrent(
                                amps,
                                &self.params,
                                self.sensing.overcurrent_threshold(),
                            ) =>
                        {
                            Notice::LoadNearLimit
                        }
                        Ok(amps) => Notice::LoadOk(amps),
                        Err(e) => {
                            warn!("Load measurement failed: {:?}", e);
                            Notice::SensorFault
                        }
                    };
                    self.notify(notice);
                }
                MenuAction::Notify(notice) => self.notify(notice),
                MenuAction::ShowPopup(kind) => self.show_popup(kind),
                MenuAction::DismissPopup => {
                    if let Err(e) = self.display.dismiss_popup() {
                        warn!("Popup dismiss failed: {:?}", e);
                    }
                }
            }
        }

        // Speed full scale may change while it is being edited
        self.pid.clamp_setpoint(self.params.speed_full_scale);
    }

    fn restore_defaults(&mut self) {
        self.params = *self.store.defaults();
        let ok = match self.store.initialize_with_defaults() {
            Ok(defaults) => {
                self.params = defaults;
                true
            }
            Err(e) => {
                error!("Restoring defaults failed: {:?}", e);
                false
            }
        };
        self.menu.save_finished(ok);
        self.pid.update_tunings(PidGains::from_params(&self.params));
        self.notify(if ok {
            Notice::DefaultsRestored
        } else {
            Notice::SaveFailed
        });
    }

    /// Write the parameters and report the outcome to the menu
    fn persist(&mut self) -> bool {
        let ok = match self.store.save(&self.params) {
            Ok(()) => true,
            Err(e) => {
                error!("Parameter save failed: {:?}", e);
                false
            }
        };
        self.menu.save_finished(ok);
        ok
    }

    /// Refresh outputs on a mode edge
    fn on_transition(&mut self, transition: Transition, now: u64) {
        self.actuator.set_indicator(transition.to);

        match transition.to {
            OperatingMode::Run => {
                let speed = self.sensing.last().map_or(0.0, |m| m.speed_rpm);
                self.pid.reset(speed);
            }
            OperatingMode::Idle | OperatingMode::Alarm => {
                self.pid.force_idle();
                self.actuator.set_motor_command(0);
            }
        }

        if transition.to.is_alarm() {
            self.buzzer_on = true;
            self.buzzer_cadence.restart(now);
            self.actuator
                .set_alarm_sound(true, self.config.buzzer_frequency_hz);
        } else if transition.from.is_alarm() {
            self.buzzer_on = false;
            self.actuator
                .set_alarm_sound(false, self.config.buzzer_frequency_hz);
        }
    }

    fn notify(&mut self, notice: Notice) {
        let text = notice.text();
        if let Err(e) = self.display.show_message(text.as_str()) {
            warn!("Message display failed: {:?}", e);
        }
    }

    fn show_popup(&mut self, kind: PopupKind) {
        if let Err(e) = self
            .display
            .show_popup(kind.title(), kind.text(), kind.needs_confirmation())
        {
            warn!("Popup display failed: {:?}", e);
        }
    }

    fn snapshot_at(&self, now_ms: u64) -> Snapshot {
        Snapshot {
            now_ms,
            mode: self.mode.mode(),
            alarm: self.alarm.active(),
            params: self.params,
            measurement: self.sensing.last(),
            control: self.pid.signal(),
            menu: self.menu.position(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(self.clock.now_ms())
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode.mode()
    }

    pub fn active_alarm(&self) -> Option<AlarmKind> {
        self.alarm.active()
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn control_signal(&self) -> ControlSignal {
        self.pid.signal()
    }

    /// Tunings the PID is currently running with
    pub fn pid_gains(&self) -> PidGains {
        self.pid.gains()
    }

    pub fn menu_position(&self) -> MenuPosition {
        self.menu.position()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store(&self) -> &ParameterStore<E> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore<E> {
        &mut self.store
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
