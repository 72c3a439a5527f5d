//! `StatusDisplay` over a character backend
//!
//! Messages take the bottom row until they expire. Popups take the whole
//! screen until dismissed. Expiry follows the snapshot clock, so messages
//! behave the same on hardware and in tests.

use heapless::String;
use tacho_core::menu::MESSAGE_LEN;
use tacho_core::traits::{DisplayError, Snapshot, StatusDisplay};

use crate::backend::DisplayBackend;
use crate::renderer::Renderer;
use crate::screen::{line, Screen, SCREEN_COLS, SCREEN_ROWS};

const MESSAGE_ROW: usize = SCREEN_ROWS - 1;

#[derive(Debug, Clone)]
struct Message {
    text: String<MESSAGE_LEN>,
    /// Set by the first render after the message arrived
    shown_at_ms: Option<u64>,
}

#[derive(Debug, Clone)]
struct Popup {
    title: String<SCREEN_COLS>,
    text: String<SCREEN_COLS>,
    needs_confirmation: bool,
}

fn copy_truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Text display with message and popup overlays
pub struct TextDisplay<B> {
    backend: B,
    renderer: Renderer,
    screen: Screen,
    message: Option<Message>,
    popup: Option<Popup>,
    message_ms: u64,
}

impl<B: DisplayBackend> TextDisplay<B> {
    pub fn new(backend: B, message_ms: u64) -> Self {
        Self {
            backend,
            renderer: Renderer::new(),
            screen: Screen::new(),
            message: None,
            popup: None,
            message_ms,
        }
    }

    /// Clear the panel and show the splash screen
    pub fn splash(&mut self) -> Result<(), DisplayError> {
        self.backend.clear()?;
        self.screen.mark_dirty();
        self.renderer.render_splash(&mut self.screen);
        self.flush()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    fn overlay_popup(&mut self) {
        let Some(popup) = &self.popup else {
            return;
        };
        let hint = if popup.needs_confirmation {
            "Enter=Yes  Back=No"
        } else {
            "Enter=OK"
        };
        self.screen.set_line(0, &popup.title);
        self.screen.set_line(1, "");
        self.screen.set_line(2, &popup.text);
        self.screen.set_line(3, hint);
        self.screen.set_highlight(None);
    }

    fn overlay_message(&mut self, now_ms: u64) {
        let Some(message) = &mut self.message else {
            return;
        };
        let shown_at = *message.shown_at_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(shown_at) >= self.message_ms {
            self.message = None;
            return;
        }
        let text = line(format_args!("{:^width$}", message.text.as_str(), width = SCREEN_COLS));
        self.screen.set_line(MESSAGE_ROW, &text);
        if self.screen.highlight() == Some(MESSAGE_ROW) {
            self.screen.set_highlight(None);
        }
    }

    /// Push changed rows to the backend
    fn flush(&mut self) -> Result<(), DisplayError> {
        if !self.screen.is_dirty() {
            return Ok(());
        }

        let highlight = self.screen.highlight();
        let rows: heapless::Vec<usize, SCREEN_ROWS> = self.screen.dirty_rows().collect();
        for row in rows {
            let text = self.screen.get_line(row).unwrap_or("");
            let padded = line(format_args!("{:<width$}", text, width = SCREEN_COLS));
            self.backend
                .write_row(row as u8, &padded, highlight == Some(row))?;
        }
        self.backend.flush()?;
        self.screen.mark_clean();
        Ok(())
    }
}

impl<B: DisplayBackend> StatusDisplay for TextDisplay<B> {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), DisplayError> {
        if !self.backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        if self.popup.is_some() {
            self.overlay_popup();
        } else {
            self.renderer.render(snapshot, &mut self.screen);
            self.overlay_message(snapshot.now_ms);
        }
        self.flush()
    }

    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        self.message = Some(Message {
            text: copy_truncated(text),
            shown_at_ms: None,
        });
        Ok(())
    }

    fn show_popup(
        &mut self,
        title: &str,
        text: &str,
        needs_confirmation: bool,
    ) -> Result<(), DisplayError> {
        self.popup = Some(Popup {
            title: copy_truncated(title),
            text: copy_truncated(text),
            needs_confirmation,
        });
        Ok(())
    }

    fn dismiss_popup(&mut self) -> Result<(), DisplayError> {
        self.popup = None;
        Ok(())
    }
}
