//! Operator push buttons

use tacho_hal::gpio::{ActiveLow, InputPin};

/// The four front-panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Up,
    Down,
    Enter,
    Back,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [ButtonId::Up, ButtonId::Down, ButtonId::Enter, ButtonId::Back];

    pub fn index(self) -> usize {
        match self {
            ButtonId::Up => 0,
            ButtonId::Down => 1,
            ButtonId::Enter => 2,
            ButtonId::Back => 3,
        }
    }
}

/// Raw (undebounced) button levels
pub trait ButtonPanel {
    /// True while the button is physically held
    fn is_pressed(&mut self, id: ButtonId) -> bool;
}

/// Buttons wired to ground with pull-ups, one GPIO each
pub struct PinButtons<U, D, E, B> {
    up: ActiveLow<U>,
    down: ActiveLow<D>,
    enter: ActiveLow<E>,
    back: ActiveLow<B>,
}

impl<U, D, E, B> PinButtons<U, D, E, B>
where
    U: InputPin,
    D: InputPin,
    E: InputPin,
    B: InputPin,
{
    pub fn new(up: U, down: D, enter: E, back: B) -> Self {
        Self {
            up: ActiveLow(up),
            down: ActiveLow(down),
            enter: ActiveLow(enter),
            back: ActiveLow(back),
        }
    }
}

impl<U, D, E, B> ButtonPanel for PinButtons<U, D, E, B>
where
    U: InputPin,
    D: InputPin,
    E: InputPin,
    B: InputPin,
{
    fn is_pressed(&mut self, id: ButtonId) -> bool {
        match id {
            ButtonId::Up => self.up.is_asserted(),
            ButtonId::Down => self.down.is_asserted(),
            ButtonId::Enter => self.enter.is_asserted(),
            ButtonId::Back => self.back.is_asserted(),
        }
    }
}
