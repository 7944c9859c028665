use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::platform::SoundPlayer;

/// Command-line players tried in order, with the arguments placed before the
/// file path.
const PLAYERS: &[(&str, &[&str])] = &[
    ("paplay", &[]),
    ("aplay", &["-q"]),
    ("afplay", &[]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
];

/// Plays sounds through an external player, fire-and-forget.
#[derive(Debug, Clone)]
pub struct CommandSoundPlayer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSoundPlayer {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Finds the first known player on `PATH`.
    pub fn detect() -> Option<Self> {
        for (name, args) in PLAYERS {
            if let Ok(program) = which::which(name) {
                tracing::info!("Playing sounds with {:?}", program);
                return Some(Self::new(
                    program,
                    args.iter().map(|a| a.to_string()).collect(),
                ));
            }
        }
        tracing::warn!("No sound player found on PATH, sounds disabled");
        None
    }
}

impl SoundPlayer for CommandSoundPlayer {
    fn play(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            bail!("Sound file not found: {:?}", path);
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn sound player {:?}", self.program))?;
        tracing::debug!("Playing {:?}", path);

        // Reap the player so finished processes do not linger.
        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                tracing::debug!("Failed to wait for sound player: {}", e);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_sound_file() {
        let player = CommandSoundPlayer::new("true", vec![]);
        let err = player.play(Path::new("/nonexistent/break_start.wav"));
        assert!(err.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_play_spawns_player() {
        let file = NamedTempFile::new().unwrap();
        let player = CommandSoundPlayer::new("true", vec!["-q".to_string()]);
        assert!(player.play(file.path()).is_ok());
    }

    #[test]
    fn test_unknown_player_fails() {
        let file = NamedTempFile::new().unwrap();
        let player = CommandSoundPlayer::new("/nonexistent/eyebreak-player", vec![]);
        assert!(player.play(file.path()).is_err());
    }
}
