//! PID speed controller
//!
//! Fixed sample time, so the integral and derivative gains are folded with
//! the sample period once when tunings change. The derivative acts on the
//! measurement rather than the error, which avoids output kicks when the
//! operator nudges the setpoint. Both the integral accumulator and the
//! output are clamped to the actuator range.

use crate::config::Parameters;

pub const OUTPUT_MIN: f32 = 0.0;
pub const OUTPUT_MAX: f32 = 255.0;

/// PID coefficients as entered by the operator (per second)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub fn from_params(params: &Parameters) -> Self {
        Self {
            kp: params.kp,
            ki: params.ki,
            kd: params.kd,
        }
    }

    fn is_usable(&self) -> bool {
        [self.kp, self.ki, self.kd]
            .iter()
            .all(|g| g.is_finite() && *g >= 0.0)
    }
}

/// Setpoint, last input and last output of the loop
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSignal {
    /// Target speed (rpm), within `0..=speed_full_scale`
    pub setpoint: f32,
    /// Speed used by the last compute (rpm)
    pub measured: f32,
    /// Actuator command from the last compute
    pub output: u8,
}

/// Speed PID with clamped output and anti-windup
#[derive(Debug, Clone)]
pub struct SpeedPid {
    gains: PidGains,
    sample_s: f32,
    /// Ki scaled by the sample period
    ki_tick: f32,
    /// Kd divided by the sample period
    kd_tick: f32,
    integral: f32,
    last_input: f32,
    signal: ControlSignal,
}

impl SpeedPid {
    pub fn new(gains: PidGains, sample_ms: u64) -> Self {
        let sample_ms = sample_ms.max(1);
        let mut pid = Self {
            gains: PidGains::default(),
            sample_s: sample_ms as f32 / 1000.0,
            ki_tick: 0.0,
            kd_tick: 0.0,
            integral: 0.0,
            last_input: 0.0,
            signal: ControlSignal::default(),
        };
        pid.update_tunings(gains);
        pid
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn signal(&self) -> ControlSignal {
        self.signal
    }

    pub fn setpoint(&self) -> f32 {
        self.signal.setpoint
    }

    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Replace the tunings; takes effect on the next compute
    ///
    /// The integral accumulator is kept. Negative or non-finite gains are
    /// ignored.
    pub fn update_tunings(&mut self, gains: PidGains) {
        if !gains.is_usable() {
            warn!("Ignoring unusable PID gains {:?}", gains);
            return;
        }
        self.gains = gains;
        self.ki_tick = gains.ki * self.sample_s;
        self.kd_tick = gains.kd / self.sample_s;
        debug!("PID tunings {:?}", gains);
    }

    /// Zero the accumulator and output, for a bumpless start
    ///
    /// `input` is the speed at the moment of (re)start; the first
    /// derivative step is taken against it.
    pub fn reset(&mut self, input: f32) {
        self.integral = 0.0;
        self.signal.output = 0;
        self.signal.measured = input;
        self.last_input = input;
    }

    /// Force the output to zero without touching the accumulator
    pub fn force_idle(&mut self) {
        self.signal.output = 0;
    }

    /// Set the target speed, clamped to `0..=speed_full_scale`
    ///
    /// Returns the value actually applied.
    pub fn set_setpoint(&mut self, value: f32, speed_full_scale: i32) -> f32 {
        let max = speed_full_scale.max(0) as f32;
        let clamped = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, max)
        };
        self.signal.setpoint = clamped;
        clamped
    }

    /// Nudge the setpoint by `step` up or down
    pub fn adjust_setpoint(&mut self, increase: bool, step: f32, speed_full_scale: i32) -> f32 {
        let delta = if increase { step } else { -step };
        self.set_setpoint(self.signal.setpoint + delta, speed_full_scale)
    }

    /// Re-apply the clamp after the full scale changed
    pub fn clamp_setpoint(&mut self, speed_full_scale: i32) -> f32 {
        self.set_setpoint(self.signal.setpoint, speed_full_scale)
    }

    /// Run one control step and return the actuator command
    pub fn compute(&mut self, input: f32) -> u8 {
        let error = self.signal.setpoint - input;

        self.integral = (self.integral + self.ki_tick * error).clamp(OUTPUT_MIN, OUTPUT_MAX);
        if !self.integral.is_finite() {
            self.integral = 0.0;
        }

        let d_input = input - self.last_input;
        let output = (self.gains.kp * error + self.integral - self.kd_tick * d_input)
            .clamp(OUTPUT_MIN, OUTPUT_MAX);

        self.last_input = input;
        self.signal.measured = input;
        // NaN casts to 0
        self.signal.output = output as u8;

        trace!(
            "PID sp={} in={} out={}",
            self.signal.setpoint,
            input,
            self.signal.output
        );
        self.signal.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gains(kp: f32, ki: f32, kd: f32) -> PidGains {
        PidGains { kp, ki, kd }
    }

    #[test]
    fn test_proportional_only() {
        let mut pid = SpeedPid::new(gains(1.0, 0.0, 0.0), 10);
        pid.set_setpoint(300.0, 500);
        assert_eq!(pid.compute(200.0), 100);
        assert_eq!(pid.compute(400.0), 0);
    }

    #[test]
    fn test_output_saturates_high() {
        let mut pid = SpeedPid::new(gains(10.0, 0.0, 0.0), 10);
        pid.set_setpoint(500.0, 500);
        assert_eq!(pid.compute(0.0), 255);
    }

    #[test]
    fn test_integral_is_bounded() {
        let mut pid = SpeedPid::new(gains(0.0, 100.0, 0.0), 10);
        pid.set_setpoint(500.0, 500);
        for _ in 0..1_000 {
            pid.compute(0.0);
        }
        assert_eq!(pid.integral(), OUTPUT_MAX);
        assert_eq!(pid.signal().output, 255);

        // Unwinds as soon as the error flips
        pid.set_setpoint(0.0, 500);
        pid.compute(100.0);
        assert!(pid.integral() < OUTPUT_MAX);
    }

    #[test]
    fn test_update_tunings_keeps_integral() {
        let mut pid = SpeedPid::new(gains(0.0, 10.0, 0.0), 10);
        pid.set_setpoint(100.0, 500);
        pid.compute(0.0);
        let before = pid.integral();
        assert!(before > 0.0);

        pid.update_tunings(gains(2.0, 1.0, 0.0));
        assert_eq!(pid.integral(), before);
    }

    #[test]
    fn test_reset_zeroes_accumulator_and_output() {
        let mut pid = SpeedPid::new(gains(1.0, 10.0, 0.0), 10);
        pid.set_setpoint(100.0, 500);
        pid.compute(0.0);
        pid.reset(0.0);
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.signal().output, 0);
        assert_eq!(pid.setpoint(), 100.0);
    }

    #[test]
    fn test_restart_has_no_derivative_kick() {
        let mut pid = SpeedPid::new(gains(1.0, 0.0, 0.1), 10);
        pid.set_setpoint(400.0, 500);
        pid.compute(400.0);

        // Motor coasts to rest while idle, then restarts with a zero target
        pid.force_idle();
        pid.set_setpoint(0.0, 500);
        pid.reset(0.0);
        assert_eq!(pid.compute(0.0), 0);
    }

    #[test]
    fn test_negative_gains_ignored() {
        let mut pid = SpeedPid::new(gains(1.0, 0.0, 0.0), 10);
        pid.update_tunings(gains(-1.0, 0.0, 0.0));
        assert_eq!(pid.gains().kp, 1.0);
    }

    #[test]
    fn test_derivative_on_measurement() {
        let mut pid = SpeedPid::new(gains(0.0, 0.0, 0.1), 10);
        pid.set_setpoint(0.0, 500);
        pid.compute(100.0);
        // Falling speed pushes output up by kd * 10 rpm / 10 ms
        let output = pid.compute(90.0);
        assert!((99..=100).contains(&output));
    }

    #[test]
    fn test_setpoint_nudge() {
        let mut pid = SpeedPid::new(PidGains::default(), 10);
        assert_eq!(pid.adjust_setpoint(true, 50.0, 500), 50.0);
        assert_eq!(pid.adjust_setpoint(false, 50.0, 500), 0.0);
        assert_eq!(pid.adjust_setpoint(false, 50.0, 500), 0.0);

        pid.set_setpoint(480.0, 500);
        assert_eq!(pid.clamp_setpoint(300), 300.0);
    }

    proptest! {
        #[test]
        fn prop_setpoint_clamp(value in -10_000.0f32..10_000.0, fs in 100i32..=500) {
            let mut pid = SpeedPid::new(PidGains::default(), 10);
            let applied = pid.set_setpoint(value, fs);
            if value < 0.0 {
                prop_assert_eq!(applied, 0.0);
            } else if value > fs as f32 {
                prop_assert_eq!(applied, fs as f32);
            } else {
                prop_assert_eq!(applied, value);
            }
        }

        #[test]
        fn prop_output_always_clamped(
            kp in 0.0f32..100.0,
            ki in 0.0f32..100.0,
            kd in 0.0f32..100.0,
            setpoint in 0.0f32..500.0,
            inputs in proptest::collection::vec(proptest::num::f32::ANY, 1..50),
        ) {
            let mut pid = SpeedPid::new(gains(kp, ki, kd), 10);
            pid.set_setpoint(setpoint, 500);
            for input in inputs {
                pid.compute(input);
                let integral = pid.integral();
                prop_assert!((OUTPUT_MIN..=OUTPUT_MAX).contains(&integral));
            }
        }
    }
}
