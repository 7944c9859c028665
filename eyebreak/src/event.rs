/// One-shot timers owned by the break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick,
    LockScreen,
    BreakEnd,
}

/// User input delivered by the display front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The pause button: pauses while counting, unpauses while paused.
    TogglePause,
    Quit,
}
