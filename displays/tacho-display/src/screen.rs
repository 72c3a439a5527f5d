//! Screen buffer
//!
//! A character buffer for a 20x4 text display. Rows remember whether they
//! changed since the last flush so the backend only receives real updates.

use core::fmt::{self, Write};

use heapless::String;

/// Number of character rows
pub const SCREEN_ROWS: usize = 4;

/// Number of character columns
pub const SCREEN_COLS: usize = 20;

/// Maximum characters per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// One display row
pub type Line = String<LINE_LEN>;

/// `fmt::Write` sink that silently drops characters past the line width
struct Truncate<'a>(&'a mut Line);

impl Write for Truncate<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format into a single row, truncated to the screen width
pub fn line(args: fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    let _ = Truncate(&mut out).write_fmt(args);
    out
}

/// Screen buffer for text-mode displays
#[derive(Clone)]
pub struct Screen {
    lines: [Line; SCREEN_ROWS],
    /// Highlighted row, drawn inverted
    highlight: Option<usize>,
    /// Rows changed since the last flush
    dirty: [bool; SCREEN_ROWS],
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen, fully dirty
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlight: None,
            dirty: [true; SCREEN_ROWS],
        }
    }

    /// Blank every row
    pub fn clear(&mut self) {
        for row in 0..SCREEN_ROWS {
            self.set_line(row, "");
        }
        self.set_highlight(None);
    }

    /// Set the content of a row, truncating to the screen width
    ///
    /// The row is only marked dirty when its content changes.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(current) = self.lines.get_mut(row) else {
            return;
        };
        let end = text
            .char_indices()
            .nth(LINE_LEN)
            .map_or(text.len(), |(i, _)| i);
        let text = &text[..end];
        if current.as_str() != text {
            current.clear();
            let _ = current.push_str(text);
            self.dirty[row] = true;
        }
    }

    /// Get the content of a row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Select which row (if any) is highlighted
    pub fn set_highlight(&mut self, row: Option<usize>) {
        let row = row.filter(|r| *r < SCREEN_ROWS);
        if row != self.highlight {
            for r in [self.highlight, row].into_iter().flatten() {
                self.dirty[r] = true;
            }
            self.highlight = row;
        }
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Check if any row needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    /// Rows that changed since the last flush
    pub fn dirty_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty
            .iter()
            .enumerate()
            .filter_map(|(row, dirty)| dirty.then_some(row))
    }

    /// Mark screen as clean (after flushing)
    pub fn mark_clean(&mut self) {
        self.dirty = [false; SCREEN_ROWS];
    }

    /// Force a full redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = [true; SCREEN_ROWS];
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_line_stays_clean() {
        let mut screen = Screen::new();
        screen.set_line(1, "Speed");
        screen.mark_clean();

        screen.set_line(1, "Speed");
        assert!(!screen.is_dirty());

        screen.set_line(1, "Current");
        assert_eq!(screen.dirty_rows().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_long_line_is_truncated() {
        let mut screen = Screen::new();
        screen.set_line(0, "0123456789abcdefghijKLMN");
        assert_eq!(screen.get_line(0), Some("0123456789abcdefghij"));
    }

    #[test]
    fn test_highlight_move_dirties_both_rows() {
        let mut screen = Screen::new();
        screen.set_highlight(Some(1));
        screen.mark_clean();
        screen.set_highlight(Some(3));
        assert_eq!(screen.dirty_rows().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_line_formatting_truncates() {
        let text = line(format_args!("{:>25}", "x"));
        assert_eq!(text.len(), LINE_LEN);
    }
}
