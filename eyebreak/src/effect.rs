use std::path::PathBuf;

use crate::core::Size;

/// Side effects computed by the break cycle and applied by the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetProgress(f64),
    SetCountdownText {
        minutes: u64,
        seconds: u64,
    },
    SetBreakText(String),
    SetTitle(String),
    SetPauseButton {
        enabled: bool,
        label: String,
    },
    SetTopmost(bool),
    MoveWindowTo {
        x: i32,
        y: i32,
    },
    /// Centering needs the live window size, so it is resolved at apply time.
    CenterWindow {
        screen: Size,
        offset: (i32, i32),
    },
    Raise,
    Minimize,
    Restore,
    FocusPauseButton,
    FocusLabel,
    LockScreen,
    PlaySound(PathBuf),
}
