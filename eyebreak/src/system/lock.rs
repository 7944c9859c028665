use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use eyebreak_config::Config;

use crate::platform::ScreenLocker;

/// Runs an external program that locks the session.
///
/// The program is spawned synchronously, so it has been issued by the time
/// `lock` returns, but its exit is awaited on a background thread to keep the
/// tick loop running.
#[derive(Debug, Clone)]
pub struct CommandScreenLocker {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandScreenLocker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parses a shell-style command line and resolves the program on `PATH`.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let Some(words) = shlex::split(command_line) else {
            bail!("Unbalanced quoting in lock command {:?}", command_line);
        };
        let mut parts = words.into_iter();
        let Some(program) = parts.next() else {
            bail!("Lock command is empty");
        };
        let resolved = which::which(&program)
            .with_context(|| format!("Lock program not found: {}", program))?;
        Ok(Self::new(resolved, parts.collect()))
    }

    #[cfg(windows)]
    pub fn lock_workstation() -> Self {
        Self::new(
            "rundll32.exe",
            vec!["user32.dll,LockWorkStation".to_string()],
        )
    }
}

impl ScreenLocker for CommandScreenLocker {
    fn lock(&self) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn lock command {:?}", self.program))?;
        tracing::info!("Lock command issued: {:?} {:?}", self.program, self.args);

        let program = self.program.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) if status.success() => {
                tracing::debug!("Lock command {:?} finished", program);
            }
            Ok(status) => {
                tracing::warn!("Lock command {:?} exited with {}", program, status);
            }
            Err(e) => {
                tracing::warn!("Failed to wait for lock command {:?}: {}", program, e);
            }
        });
        Ok(())
    }
}

/// Screen locker chosen for this platform and configuration.
#[derive(Debug, Clone)]
pub enum SystemScreenLocker {
    Command(CommandScreenLocker),
    Disabled,
}

impl SystemScreenLocker {
    pub fn from_config(config: &Config) -> Self {
        if !config.lock_screen_enabled {
            tracing::debug!("Screen locking disabled by configuration");
            return Self::Disabled;
        }

        platform_locker(config)
    }
}

#[cfg(unix)]
fn platform_locker(config: &Config) -> SystemScreenLocker {
    match CommandScreenLocker::from_command_line(&config.lock_command) {
        Ok(locker) => SystemScreenLocker::Command(locker),
        Err(e) => {
            tracing::warn!("Screen locking unavailable: {:#}", e);
            SystemScreenLocker::Disabled
        }
    }
}

#[cfg(windows)]
fn platform_locker(_config: &Config) -> SystemScreenLocker {
    SystemScreenLocker::Command(CommandScreenLocker::lock_workstation())
}

#[cfg(not(any(unix, windows)))]
fn platform_locker(_config: &Config) -> SystemScreenLocker {
    tracing::warn!("Screen locking is not supported on this platform");
    SystemScreenLocker::Disabled
}

impl ScreenLocker for SystemScreenLocker {
    fn lock(&self) -> Result<()> {
        match self {
            Self::Command(locker) => locker.lock(),
            Self::Disabled => {
                tracing::debug!("Screen lock skipped: no locker available");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lock_command_rejected() {
        assert!(CommandScreenLocker::from_command_line("").is_err());
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        assert!(CommandScreenLocker::from_command_line("true 'open").is_err());
        assert!(CommandScreenLocker::from_command_line("true \"open").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_line_quoting() {
        let locker = CommandScreenLocker::from_command_line(
            r#"true --dest='org.x Screen' "a \"b\"" c\ d"#,
        )
        .unwrap();
        assert!(locker.program.ends_with("true"));
        assert_eq!(locker.args, vec!["--dest=org.x Screen", "a \"b\"", "c d"]);
    }

    #[test]
    fn test_unknown_lock_program_rejected() {
        assert!(
            CommandScreenLocker::from_command_line("eyebreak-no-such-locker --lock").is_err()
        );
    }

    #[test]
    fn test_disabled_by_configuration() {
        let locker = SystemScreenLocker::from_config(&Config::default());
        assert!(matches!(locker, SystemScreenLocker::Disabled));
        assert!(locker.lock().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_lock_program_degrades_to_disabled() {
        let config = Config {
            lock_screen_enabled: true,
            lock_command: "eyebreak-no-such-locker --lock".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            SystemScreenLocker::from_config(&config),
            SystemScreenLocker::Disabled
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_spawns_program() {
        let locker = CommandScreenLocker::new("true", vec![]);
        assert!(locker.lock().is_ok());

        let missing = CommandScreenLocker::new("/nonexistent/eyebreak-locker", vec![]);
        assert!(missing.lock().is_err());
    }
}
