use crate::core::centered_origin;
use crate::effect::Effect;
use crate::platform::{Display, ScreenLocker, SoundPlayer};

/// Execute side effects.
///
/// Lock and sound failures are logged here and never returned: the break
/// cycle keeps running whatever the collaborators do.
pub fn execute_effects<D: Display, L: ScreenLocker, P: SoundPlayer>(
    effects: Vec<Effect>,
    display: &D,
    locker: &L,
    sound: Option<&P>,
) {
    for effect in effects {
        match effect {
            Effect::SetProgress(percent) => display.set_progress(percent),
            Effect::SetCountdownText { minutes, seconds } => {
                display.set_countdown_text(minutes, seconds)
            }
            Effect::SetBreakText(message) => display.set_break_text(&message),
            Effect::SetTitle(text) => display.set_title(&text),
            Effect::SetPauseButton { enabled, label } => {
                display.set_pause_button_state(enabled, &label)
            }
            Effect::SetTopmost(topmost) => display.set_topmost(topmost),
            Effect::MoveWindowTo { x, y } => display.move_window_to(x, y),
            Effect::CenterWindow { screen, offset } => {
                let window = display.window_size();
                let (x, y) = centered_origin(screen, window, offset);
                tracing::debug!(
                    "Centering {}x{} window on {}x{} screen at ({}, {})",
                    window.width,
                    window.height,
                    screen.width,
                    screen.height,
                    x,
                    y
                );
                display.move_window_to(x, y);
            }
            Effect::Raise => display.raise(),
            Effect::Minimize => display.minimize(),
            Effect::Restore => display.restore(),
            Effect::FocusPauseButton => display.focus_pause_button(),
            Effect::FocusLabel => display.focus_label(),
            Effect::LockScreen => {
                if let Err(e) = locker.lock() {
                    tracing::warn!("Failed to lock screen: {:#}", e);
                }
            }
            Effect::PlaySound(path) => match sound {
                Some(player) => {
                    if let Err(e) = player.play(&path) {
                        tracing::warn!("Failed to play {:?}: {:#}", path, e);
                    }
                }
                None => tracing::debug!("No sound player, skipping {:?}", path),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Size;
    use crate::platform::mock::{DisplayCall, MockDisplay, MockScreenLocker, MockSoundPlayer};
    use std::path::PathBuf;

    #[test]
    fn test_center_window_uses_live_window_size() {
        let display = MockDisplay::new().with_window(Size::new(400, 100));
        let locker = MockScreenLocker::new();

        execute_effects::<_, _, MockSoundPlayer>(
            vec![Effect::CenterWindow {
                screen: Size::new(1920, 1080),
                offset: (5, -5),
            }],
            &display,
            &locker,
            None,
        );

        assert_eq!(display.take_calls(), vec![DisplayCall::MoveWindowTo(765, 485)]);
    }

    #[test]
    fn test_display_effects_in_order() {
        let display = MockDisplay::new();
        let locker = MockScreenLocker::new();

        execute_effects::<_, _, MockSoundPlayer>(
            vec![
                Effect::SetTitle("EyeBreak".to_string()),
                Effect::SetPauseButton {
                    enabled: false,
                    label: "Pause".to_string(),
                },
                Effect::Raise,
                Effect::FocusLabel,
            ],
            &display,
            &locker,
            None,
        );

        assert_eq!(
            display.take_calls(),
            vec![
                DisplayCall::SetTitle("EyeBreak".to_string()),
                DisplayCall::SetPauseButtonState(false, "Pause".to_string()),
                DisplayCall::Raise,
                DisplayCall::FocusLabel,
            ]
        );
    }

    #[test]
    fn test_missing_sound_player_is_noop() {
        let display = MockDisplay::new();
        let locker = MockScreenLocker::new();

        execute_effects::<_, _, MockSoundPlayer>(
            vec![Effect::PlaySound(PathBuf::from("break_start.wav"))],
            &display,
            &locker,
            None,
        );

        assert!(display.take_calls().is_empty());
    }

    #[test]
    fn test_capability_failures_do_not_stop_execution() {
        let display = MockDisplay::new();
        let locker = MockScreenLocker::failing();
        let sound = MockSoundPlayer::failing();

        execute_effects(
            vec![
                Effect::LockScreen,
                Effect::PlaySound(PathBuf::from("break_end.wav")),
                Effect::SetProgress(0.0),
            ],
            &display,
            &locker,
            Some(&sound),
        );

        assert_eq!(locker.locks.get(), 1);
        assert_eq!(sound.played.borrow().len(), 1);
        assert_eq!(display.take_calls(), vec![DisplayCall::SetProgress(0.0)]);
    }
}
