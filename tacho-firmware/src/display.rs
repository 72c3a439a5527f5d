//! Display backend that streams screen rows over defmt
//!
//! Stands in for a physical character panel: rows are buffered as they
//! arrive and each changed row is logged once on flush, with `>` marking
//! the menu selection.

use defmt::info;
use heapless::String;
use tacho_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

type Row = String<SCREEN_COLS>;

pub struct LogBackend {
    rows: [Row; SCREEN_ROWS],
    changed: [bool; SCREEN_ROWS],
    selected: Option<u8>,
}

impl LogBackend {
    pub fn new() -> Self {
        Self {
            rows: core::array::from_fn(|_| Row::new()),
            changed: [false; SCREEN_ROWS],
            selected: None,
        }
    }
}

impl DisplayBackend for LogBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for row in self.rows.iter_mut() {
            row.clear();
        }
        self.changed = [true; SCREEN_ROWS];
        self.selected = None;
        Ok(())
    }

    fn write_row(&mut self, row: u8, text: &str, highlighted: bool) -> Result<(), DisplayError> {
        let slot = self
            .rows
            .get_mut(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;

        if slot.as_str() != text {
            slot.clear();
            for c in text.chars() {
                if slot.push(c).is_err() {
                    break;
                }
            }
            self.changed[row as usize] = true;
        }

        let selected = if highlighted {
            Some(row)
        } else if self.selected == Some(row) {
            None
        } else {
            self.selected
        };
        if selected != self.selected {
            self.selected = selected;
            self.changed[row as usize] = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        for (i, row) in self.rows.iter().enumerate() {
            if !self.changed[i] {
                continue;
            }
            let marker = if self.selected == Some(i as u8) { '>' } else { ' ' };
            info!("LCD{}{}|{}|", i, marker, row.as_str());
        }
        self.changed = [false; SCREEN_ROWS];
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}
