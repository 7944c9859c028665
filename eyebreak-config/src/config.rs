use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::template::{render, Arg};

/// Break reminder settings.
///
/// Field names on disk keep the historical flat key set so existing
/// configuration files continue to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Countdown label, rendered with minutes and seconds.
    #[serde(rename = "text_break_in")]
    pub countdown_text: String,
    #[serde(rename = "text_break_now")]
    pub break_text: String,
    /// Window title, rendered with the paused suffix or an empty string.
    #[serde(rename = "text_title")]
    pub title: String,
    #[serde(rename = "text_title_paused")]
    pub paused_title_suffix: String,
    #[serde(rename = "text_button_pause")]
    pub pause_label: String,
    #[serde(rename = "text_button_unpase")]
    pub unpause_label: String,

    #[serde(rename = "time_break_after")]
    pub break_after_seconds: i64,
    #[serde(rename = "time_break_time")]
    pub break_duration_seconds: i64,

    #[serde(rename = "option_always_on_top")]
    pub always_on_top: bool,
    #[serde(rename = "option_on_top_paused")]
    pub on_top_while_paused: bool,
    #[serde(rename = "option_popup_offset")]
    pub popup_offset: (i32, i32),
    #[serde(rename = "option_lock_screen")]
    pub lock_screen_enabled: bool,
    #[serde(rename = "option_lock_screen_command")]
    pub lock_command: String,
    #[serde(rename = "option_lock_screen__comment")]
    pub lock_command_comment: String,
    #[serde(rename = "option_lock_screen_command_unlock")]
    pub unlock_command: String,
    #[serde(rename = "option_minimize_counting_down")]
    pub minimize_while_counting: bool,

    pub sound_break_start: String,
    pub sound_break_end: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countdown_text: "Next eye break in {0: >2}:{1:0>2}".to_string(),
            break_text: "Take an eye-break.".to_string(),
            title: "{}EyeBreak".to_string(),
            paused_title_suffix: "[PAUSED]".to_string(),
            pause_label: "Pause".to_string(),
            unpause_label: "Unpause".to_string(),
            break_after_seconds: 3600,
            break_duration_seconds: 60,
            always_on_top: true,
            on_top_while_paused: false,
            popup_offset: (0, 0),
            lock_screen_enabled: false,
            lock_command: "gnome-screensaver-command --lock".to_string(),
            lock_command_comment:
                "This is only used on linux, since there is a lot of screensavers.".to_string(),
            unlock_command: "gnome-screensaver-command --unlock".to_string(),
            minimize_while_counting: true,
            sound_break_start: "break_start.wav".to_string(),
            sound_break_end: "break_end.wav".to_string(),
        }
    }
}

impl Config {
    /// Rejects values the break cycle cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.break_after_seconds <= 0 {
            return Err(ConfigError::invalid(
                "time_break_after",
                format!("must be positive, got {}", self.break_after_seconds),
            ));
        }
        if self.break_duration_seconds <= 0 {
            return Err(ConfigError::invalid(
                "time_break_time",
                format!("must be positive, got {}", self.break_duration_seconds),
            ));
        }

        self.render_countdown(0, 0)?;
        self.render_title(false)?;
        self.render_title(true)?;
        Ok(())
    }

    pub fn break_after(&self) -> u64 {
        self.break_after_seconds.max(0) as u64
    }

    pub fn break_duration(&self) -> u64 {
        self.break_duration_seconds.max(0) as u64
    }

    pub fn render_countdown(&self, minutes: u64, seconds: u64) -> Result<String> {
        render(&self.countdown_text, &[Arg::Int(minutes), Arg::Int(seconds)])
    }

    pub fn render_title(&self, paused: bool) -> Result<String> {
        let suffix = if paused {
            self.paused_title_suffix.as_str()
        } else {
            ""
        };
        render(&self.title, &[Arg::Text(suffix)])
    }
}
