//! Persisted operator parameters and their validity ranges

use heapless::Vec;

pub const CURRENT_FULL_SCALE_MIN: f32 = 1.0;
pub const CURRENT_FULL_SCALE_MAX: f32 = 50.0;
pub const SPEED_FULL_SCALE_MIN: i32 = 100;
pub const SPEED_FULL_SCALE_MAX: i32 = 500;
pub const GAIN_MIN: f32 = 0.0;
pub const GAIN_MAX: f32 = 100.0;

/// Identifies one persisted parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    CurrentFullScale,
    SpeedFullScale,
    Kp,
    Ki,
    Kd,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::CurrentFullScale,
        Field::SpeedFullScale,
        Field::Kp,
        Field::Ki,
        Field::Kd,
    ];

    /// Short label for the menu (fits a 20 column line with its value)
    pub fn label(self) -> &'static str {
        match self {
            Field::CurrentFullScale => "Current FS",
            Field::SpeedFullScale => "Speed FS",
            Field::Kp => "Kp",
            Field::Ki => "Ki",
            Field::Kd => "Kd",
        }
    }

    /// Unit suffix for display
    pub fn unit(self) -> &'static str {
        match self {
            Field::CurrentFullScale => "A",
            Field::SpeedFullScale => "rpm",
            Field::Kp | Field::Ki | Field::Kd => "",
        }
    }

    /// Increment applied by one Up/Down press while editing
    pub fn step(self) -> f32 {
        match self {
            Field::CurrentFullScale => 1.0,
            Field::SpeedFullScale => 100.0,
            Field::Kp | Field::Ki | Field::Kd => 0.1,
        }
    }

    /// Inclusive editing and validity range
    pub fn limits(self) -> (f32, f32) {
        match self {
            Field::CurrentFullScale => (CURRENT_FULL_SCALE_MIN, CURRENT_FULL_SCALE_MAX),
            Field::SpeedFullScale => (SPEED_FULL_SCALE_MIN as f32, SPEED_FULL_SCALE_MAX as f32),
            Field::Kp | Field::Ki | Field::Kd => (GAIN_MIN, GAIN_MAX),
        }
    }

    pub fn is_gain(self) -> bool {
        matches!(self, Field::Kp | Field::Ki | Field::Kd)
    }

    /// Check a candidate value against this field's range
    pub fn accepts(self, value: f32) -> bool {
        let (min, max) = self.limits();
        value.is_finite() && value >= min && value <= max
    }
}

/// Result of a single edit step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdjustOutcome {
    /// Value moved (possibly clamped onto the limit)
    Changed,
    /// Value was already at the limit in the requested direction
    AtLimit,
}

/// Operator-editable settings persisted across power cycles
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameters {
    /// Current corresponding to a full-scale ADC reading (amps)
    pub current_full_scale: f32,
    /// Speed corresponding to a full-scale ADC reading (rpm)
    pub speed_full_scale: i32,
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Parameters {
    pub const DEFAULT: Parameters = Parameters {
        current_full_scale: 30.0,
        speed_full_scale: 500,
        kp: 1.0,
        ki: 0.0,
        kd: 0.0,
    };

    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::CurrentFullScale => self.current_full_scale,
            Field::SpeedFullScale => self.speed_full_scale as f32,
            Field::Kp => self.kp,
            Field::Ki => self.ki,
            Field::Kd => self.kd,
        }
    }

    pub fn set(&mut self, field: Field, value: f32) {
        match field {
            Field::CurrentFullScale => self.current_full_scale = value,
            Field::SpeedFullScale => self.speed_full_scale = value as i32,
            Field::Kp => self.kp = value,
            Field::Ki => self.ki = value,
            Field::Kd => self.kd = value,
        }
    }

    pub fn field_valid(&self, field: Field) -> bool {
        match field {
            Field::SpeedFullScale => {
                (SPEED_FULL_SCALE_MIN..=SPEED_FULL_SCALE_MAX).contains(&self.speed_full_scale)
            }
            other => other.accepts(self.get(other)),
        }
    }

    pub fn is_valid(&self) -> bool {
        Field::ALL.iter().all(|&field| self.field_valid(field))
    }

    /// Replace every out-of-range field with its value from `defaults`
    ///
    /// Returns the fields that were replaced.
    pub fn repair(&mut self, defaults: &Parameters) -> Vec<Field, 5> {
        let mut repaired = Vec::new();
        for field in Field::ALL {
            if !self.field_valid(field) {
                self.set(field, defaults.get(field));
                // Capacity equals Field::ALL.len()
                let _ = repaired.push(field);
            }
        }
        repaired
    }

    /// Step `field` one increment up or down, clamped to its limits
    pub fn adjust(&mut self, field: Field, increase: bool) -> AdjustOutcome {
        let (min, max) = field.limits();
        let current = self.get(field);
        let step = if increase { field.step() } else { -field.step() };
        let mut next = (current + step).clamp(min, max);
        if field.is_gain() {
            next = snap_tenths(next);
        }

        if next == current {
            AdjustOutcome::AtLimit
        } else {
            self.set(field, next);
            AdjustOutcome::Changed
        }
    }
}

/// Round a non-negative value to the nearest 0.1
fn snap_tenths(value: f32) -> f32 {
    ((value * 10.0 + 0.5) as i32) as f32 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Parameters::DEFAULT.is_valid());
    }

    #[test]
    fn test_repair_replaces_only_bad_fields() {
        let mut params = Parameters {
            current_full_scale: 75.0,
            speed_full_scale: 250,
            kp: f32::NAN,
            ki: 0.5,
            kd: -1.0,
        };

        let repaired = params.repair(&Parameters::DEFAULT);

        assert_eq!(
            repaired.as_slice(),
            &[Field::CurrentFullScale, Field::Kp, Field::Kd]
        );
        assert_eq!(params.current_full_scale, 30.0);
        assert_eq!(params.speed_full_scale, 250);
        assert_eq!(params.kp, 1.0);
        assert_eq!(params.ki, 0.5);
        assert_eq!(params.kd, 0.0);
    }

    #[test]
    fn test_speed_adjust_clamps_then_reports_limit() {
        let mut params = Parameters {
            speed_full_scale: 450,
            ..Parameters::DEFAULT
        };

        assert_eq!(
            params.adjust(Field::SpeedFullScale, true),
            AdjustOutcome::Changed
        );
        assert_eq!(params.speed_full_scale, 500);
        assert_eq!(
            params.adjust(Field::SpeedFullScale, true),
            AdjustOutcome::AtLimit
        );
        assert_eq!(params.speed_full_scale, 500);
    }

    #[test]
    fn test_gain_floor() {
        let mut params = Parameters::DEFAULT;
        assert_eq!(params.adjust(Field::Ki, false), AdjustOutcome::AtLimit);
        assert_eq!(params.ki, 0.0);
    }

    #[test]
    fn test_gain_steps_stay_on_tenths() {
        let mut params = Parameters::DEFAULT;
        for _ in 0..7 {
            params.adjust(Field::Kd, true);
        }
        assert_eq!(params.kd, 0.7);
    }

    proptest! {
        #[test]
        fn prop_repair_always_yields_valid(
            current in proptest::num::f32::ANY,
            speed in any::<i32>(),
            kp in proptest::num::f32::ANY,
            ki in proptest::num::f32::ANY,
            kd in proptest::num::f32::ANY,
        ) {
            let mut params = Parameters { current_full_scale: current, speed_full_scale: speed, kp, ki, kd };
            let was_valid = params.is_valid();
            let repaired = params.repair(&Parameters::DEFAULT);
            prop_assert!(params.is_valid());
            prop_assert_eq!(was_valid, repaired.is_empty());
        }

        #[test]
        fn prop_adjust_stays_in_limits(
            presses in proptest::collection::vec(any::<(u8, bool)>(), 0..60),
        ) {
            let mut params = Parameters::DEFAULT;
            for (index, increase) in presses {
                let field = Field::ALL[index as usize % Field::ALL.len()];
                params.adjust(field, increase);
                prop_assert!(params.field_valid(field));
            }
        }
    }
}
