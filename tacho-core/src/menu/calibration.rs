//! Current-sensor calibration wizard steps

/// Wizard position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationStep {
    /// Operator disconnects the load; Enter takes the zero point
    #[default]
    RemoveLoad,
    /// Operator applies full load; Enter measures it
    ApplyFullLoad,
    /// Finished; Enter returns to Settings
    Done,
}

impl CalibrationStep {
    /// Step after Enter, or `None` when the wizard is finished
    pub fn next(self) -> Option<Self> {
        match self {
            CalibrationStep::RemoveLoad => Some(CalibrationStep::ApplyFullLoad),
            CalibrationStep::ApplyFullLoad => Some(CalibrationStep::Done),
            CalibrationStep::Done => None,
        }
    }

    /// Two prompt lines for the display
    pub fn prompt(self) -> (&'static str, &'static str) {
        match self {
            CalibrationStep::RemoveLoad => ("Remove motor load", "Enter: set zero"),
            CalibrationStep::ApplyFullLoad => ("Apply full load", "Enter: measure"),
            CalibrationStep::Done => ("Calibration done", "Enter: finish"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_linear() {
        let mut step = CalibrationStep::default();
        let mut seen = 1;
        while let Some(next) = step.next() {
            step = next;
            seen += 1;
        }
        assert_eq!(step, CalibrationStep::Done);
        assert_eq!(seen, 3);
    }
}
