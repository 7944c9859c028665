use std::path::Path;

use anyhow::Result;

use crate::core::Size;

/// The reminder window, driven by the break cycle.
/// Implementations log and swallow their own failures; a rejected call must
/// never stop the cycle.
pub trait Display {
    fn set_progress(&self, percent: f64);
    fn set_countdown_text(&self, minutes: u64, seconds: u64);
    fn set_break_text(&self, message: &str);
    fn set_title(&self, text: &str);
    fn set_pause_button_state(&self, enabled: bool, label: &str);
    fn set_topmost(&self, topmost: bool);
    fn move_window_to(&self, x: i32, y: i32);
    fn raise(&self);
    fn minimize(&self);
    fn restore(&self);
    fn focus_pause_button(&self);
    fn focus_label(&self);
    fn screen_size(&self) -> Size;
    fn window_size(&self) -> Size;

    /// Called once when the cycle stops.
    fn close(&self) {}
}

/// Locks the workstation.
pub trait ScreenLocker {
    fn lock(&self) -> Result<()>;
}

/// Plays a sound file without waiting for it to finish.
pub trait SoundPlayer {
    fn play(&self, path: &Path) -> Result<()>;
}
