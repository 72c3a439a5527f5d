//! Character display backend
//!
//! The text renderer works in whole rows: every changed row is sent
//! already padded to the screen width, with a flag saying whether it is
//! the selected row. A backend only has to put the characters somewhere.

use tacho_core::traits::DisplayError;

/// Row-oriented character display
///
/// Implementations wrap an HD44780-style LCD, an OLED text mode, or a
/// debug sink that just logs the rows.
pub trait DisplayBackend {
    /// Blank every row
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Replace row `row` with `text`
    ///
    /// `highlighted` marks the menu selection; panels that cannot invert
    /// may show a cursor or ignore it.
    fn write_row(&mut self, row: u8, text: &str, highlighted: bool) -> Result<(), DisplayError>;

    /// Push buffered rows to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    fn is_ready(&self) -> bool;
}
