use std::cell::RefCell;
use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, SetTitle};
use crossterm::QueueableCommand;
use eyebreak_config::Config;

use crate::core::Size;
use crate::platform::Display;

const BAR_WIDTH: usize = 20;
const FALLBACK_SCREEN: Size = Size {
    width: 80,
    height: 24,
};

/// Window attributes the terminal cannot express, tracked so the status line
/// and logs reflect them.
#[derive(Debug, Clone, PartialEq)]
struct WindowState {
    x: i32,
    y: i32,
    topmost: bool,
    minimized: bool,
    progress: f64,
    label: String,
    button_label: String,
    button_enabled: bool,
    focus: Focus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    None,
    PauseButton,
    Label,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            topmost: false,
            minimized: false,
            progress: 0.0,
            label: String::new(),
            button_label: String::new(),
            button_enabled: true,
            focus: Focus::None,
        }
    }
}

impl WindowState {
    fn geometry(&self) -> String {
        format!(
            "at ({}, {}), topmost={}, minimized={}",
            self.x, self.y, self.topmost, self.minimized
        )
    }

    fn status_line(&self) -> String {
        let filled = ((self.progress / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let button = if self.button_enabled {
            format!("[{}]", self.button_label)
        } else {
            format!("({})", self.button_label)
        };
        let marker = if self.focus == Focus::PauseButton {
            ">"
        } else {
            " "
        };
        format!(
            "[{}{}] {:>3.0}%  {}  {}{}",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            self.progress,
            self.label,
            marker,
            button
        )
    }
}

/// Terminal rendition of the reminder window: a single status line redrawn in
/// place and the terminal title.
pub struct ConsoleDisplay {
    config: Config,
    window: RefCell<WindowState>,
    out: RefCell<Box<dyn Write>>,
}

impl ConsoleDisplay {
    pub fn new(config: &Config) -> Self {
        Self::with_writer(config, Box::new(io::stdout()))
    }

    pub fn with_writer(config: &Config, out: Box<dyn Write>) -> Self {
        Self {
            config: config.clone(),
            window: RefCell::new(WindowState::default()),
            out: RefCell::new(out),
        }
    }

    fn redraw(&self) {
        let line = self.window.borrow().status_line();
        let mut out = self.out.borrow_mut();
        let result = out
            .queue(MoveToColumn(0))
            .and_then(|out| out.queue(Clear(ClearType::CurrentLine)))
            .and_then(|out| out.queue(Print(line)))
            .and_then(|out| out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to draw status line: {}", e);
        }
    }

    fn set_geometry(&self, action: &str, f: impl FnOnce(&mut WindowState)) {
        let mut window = self.window.borrow_mut();
        f(&mut window);
        tracing::debug!("Window {}: {}", action, window.geometry());
    }

    fn update(&self, f: impl FnOnce(&mut WindowState)) {
        f(&mut self.window.borrow_mut());
        self.redraw();
    }
}

impl Display for ConsoleDisplay {
    fn set_progress(&self, percent: f64) {
        self.update(|w| w.progress = percent.clamp(0.0, 100.0));
    }

    fn set_countdown_text(&self, minutes: u64, seconds: u64) {
        match self.config.render_countdown(minutes, seconds) {
            Ok(text) => self.update(|w| w.label = text),
            Err(e) => tracing::warn!("Failed to render countdown: {}", e),
        }
    }

    fn set_break_text(&self, message: &str) {
        self.update(|w| w.label = message.to_string());
        let mut out = self.out.borrow_mut();
        let result = out.queue(Print('\x07')).and_then(|out| out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to ring terminal bell: {}", e);
        }
    }

    fn set_title(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        let result = out.queue(SetTitle(text)).and_then(|out| out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to set terminal title: {}", e);
        }
    }

    fn set_pause_button_state(&self, enabled: bool, label: &str) {
        self.update(|w| {
            w.button_enabled = enabled;
            w.button_label = label.to_string();
        });
    }

    fn set_topmost(&self, topmost: bool) {
        self.set_geometry("topmost", |w| w.topmost = topmost);
    }

    fn move_window_to(&self, x: i32, y: i32) {
        self.set_geometry("moved", |w| {
            w.x = x;
            w.y = y;
        });
    }

    fn raise(&self) {
        tracing::debug!("Window raised");
    }

    fn minimize(&self) {
        self.set_geometry("minimized", |w| w.minimized = true);
    }

    fn restore(&self) {
        self.set_geometry("restored", |w| w.minimized = false);
    }

    fn focus_pause_button(&self) {
        self.update(|w| w.focus = Focus::PauseButton);
    }

    fn focus_label(&self) {
        self.update(|w| w.focus = Focus::Label);
    }

    fn screen_size(&self) -> Size {
        match terminal::size() {
            Ok((width, height)) => Size::new(width as u32, height as u32),
            Err(e) => {
                tracing::warn!("Failed to query terminal size: {}", e);
                FALLBACK_SCREEN
            }
        }
    }

    fn window_size(&self) -> Size {
        let width = self.window.borrow().status_line().chars().count();
        Size::new(width as u32, 1)
    }

    // Ends the in-place status line so the shell prompt starts below it.
    fn close(&self) {
        let mut out = self.out.borrow_mut();
        let result = out.write_all(b"\n").and_then(|()| out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to finish status line: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn buffered_display() -> (ConsoleDisplay, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let display =
            ConsoleDisplay::with_writer(&Config::default(), Box::new(buffer.clone()));
        (display, buffer)
    }

    #[test]
    fn test_break_text_rings_bell_in_place() {
        let (display, buffer) = buffered_display();
        display.set_break_text("Take an eye-break.");

        let text = buffer.text();
        assert!(text.contains("Take an eye-break."));
        assert!(text.ends_with('\x07'));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_close_ends_status_line() {
        let (display, buffer) = buffered_display();
        display.set_countdown_text(60, 0);
        assert!(!buffer.text().contains('\n'));

        display.close();
        let text = buffer.text();
        assert!(text.contains("Next eye break in 60:00"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_status_line_progress_bar() {
        let window = WindowState {
            progress: 50.0,
            label: "Next eye break in 30:00".to_string(),
            button_label: "Pause".to_string(),
            ..WindowState::default()
        };
        assert_eq!(
            window.status_line(),
            "[##########----------]  50%  Next eye break in 30:00   [Pause]"
        );
    }

    #[test]
    fn test_status_line_disabled_button_and_focus() {
        let window = WindowState {
            progress: 100.0,
            label: "Take an eye-break.".to_string(),
            button_label: "Pause".to_string(),
            button_enabled: false,
            focus: Focus::Label,
            ..WindowState::default()
        };
        assert!(window.status_line().ends_with("Take an eye-break.   (Pause)"));

        let window = WindowState {
            focus: Focus::PauseButton,
            button_label: "Unpause".to_string(),
            ..WindowState::default()
        };
        assert!(window.status_line().ends_with(">[Unpause]"));
    }

    #[test]
    fn test_tracks_virtual_window() {
        let (display, _) = buffered_display();
        display.move_window_to(12, 34);
        display.set_topmost(true);
        display.minimize();

        let window = display.window.borrow();
        assert_eq!((window.x, window.y), (12, 34));
        assert!(window.topmost);
        assert!(window.minimized);
    }
}
