use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::platform::{Display, ScreenLocker, SoundPlayer};

use super::controller::Controller;
use super::input::parse_input;

/// Drives the controller in real time until quit or Ctrl-C.
///
/// The cycle keeps virtual time measured from `origin`; each wakeup hands it
/// the elapsed wall time and it fires whatever is due.
pub async fn run<D: Display, L: ScreenLocker, P: SoundPlayer>(
    mut controller: Controller<D, L, P>,
) -> Result<()> {
    let origin = Instant::now();
    controller.start();
    tracing::info!("Break cycle started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ctrl_c_armed = true;

    loop {
        let deadline = controller.next_deadline();
        tokio::select! {
            _ = sleep_until_deadline(origin, deadline) => {
                controller.advance(origin.elapsed());
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_input(&line) {
                    Some(input) => {
                        tracing::debug!("Input: {:?}", input);
                        if !controller.handle_input(input) {
                            tracing::info!("Quit requested");
                            break;
                        }
                    }
                    None => tracing::debug!("Ignoring input {:?}", line),
                },
                Ok(None) => {
                    tracing::debug!("stdin closed, keyboard input disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
            result = &mut ctrl_c, if ctrl_c_armed => {
                ctrl_c_armed = false;
                match result {
                    Ok(()) => {
                        tracing::info!("Interrupted");
                        break;
                    }
                    Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
                }
            }
        }
    }

    controller.shutdown();
    Ok(())
}

/// Wall-clock instant of a cycle deadline. None when there is no deadline or
/// it lies past what the clock can represent.
fn deadline_instant(origin: Instant, deadline: Option<Duration>) -> Option<Instant> {
    deadline.and_then(|deadline| origin.checked_add(deadline))
}

async fn sleep_until_deadline(origin: Instant, deadline: Option<Duration>) {
    match deadline_instant(origin, deadline) {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BreakCycle, Phase, Size};
    use eyebreak_config::Config;

    #[test]
    fn test_deadline_instant() {
        let origin = Instant::now();
        assert_eq!(
            deadline_instant(origin, Some(Duration::from_secs(1))),
            Some(origin + Duration::from_secs(1))
        );
        assert_eq!(deadline_instant(origin, None), None);
    }

    #[test]
    fn test_unrepresentable_break_end_waits_forever() {
        let config = Config {
            break_after_seconds: 1,
            break_duration_seconds: i64::MAX,
            ..Config::default()
        };
        let mut cycle = BreakCycle::new(config, Size::new(1920, 1080)).unwrap();
        cycle.start();
        cycle.advance(Duration::from_secs(1));
        assert_eq!(cycle.phase(), Phase::Breaking);

        let deadline = cycle.next_deadline();
        assert!(deadline.is_some());
        assert_eq!(deadline_instant(Instant::now(), deadline), None);
    }
}
