use crate::event::Input;

/// Maps a line typed on stdin to an input. An empty line presses the pause
/// button.
pub fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "p" | "pause" => Some(Input::TogglePause),
        "q" | "quit" => Some(Input::Quit),
        _ => None,
    }
}
