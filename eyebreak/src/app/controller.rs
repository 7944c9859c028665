use std::time::Duration;

use eyebreak_config::{Config, ConfigError};

use crate::core::{BreakCycle, Phase};
use crate::effect::Effect;
use crate::event::Input;
use crate::platform::{Display, ScreenLocker, SoundPlayer};

use super::effects::execute_effects;

/// Binds the break cycle to its collaborators: every transition's effects are
/// applied before the call returns.
pub struct Controller<D, L, P> {
    cycle: BreakCycle,
    display: D,
    locker: L,
    sound: Option<P>,
}

impl<D: Display, L: ScreenLocker, P: SoundPlayer> Controller<D, L, P> {
    /// Captures the screen size once; it is not re-queried during the run.
    pub fn new(
        config: Config,
        display: D,
        locker: L,
        sound: Option<P>,
    ) -> Result<Self, ConfigError> {
        let screen = display.screen_size();
        tracing::info!("Screen size: {}x{}", screen.width, screen.height);
        let cycle = BreakCycle::new(config, screen)?;
        Ok(Self {
            cycle,
            display,
            locker,
            sound,
        })
    }

    #[cfg(test)]
    pub fn cycle(&self) -> &BreakCycle {
        &self.cycle
    }

    #[cfg(test)]
    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn phase(&self) -> Phase {
        self.cycle.phase()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.cycle.next_deadline()
    }

    pub fn start(&mut self) {
        let effects = self.cycle.start();
        self.apply(effects);
    }

    /// Returns false when the input asks to quit.
    pub fn handle_input(&mut self, input: Input) -> bool {
        match input {
            Input::TogglePause => {
                let effects = self.cycle.toggle_pause();
                self.apply(effects);
                true
            }
            Input::Quit => false,
        }
    }

    /// Runs every timer due at `now`, measured from the start of the run.
    pub fn advance(&mut self, now: Duration) {
        let effects = self.cycle.advance(now);
        self.apply(effects);
    }

    pub fn shutdown(&mut self) {
        self.cycle.shutdown();
        self.display.close();
        tracing::info!("Break cycle stopped in phase {:?}", self.cycle.phase());
    }

    fn apply(&self, effects: Vec<Effect>) {
        execute_effects(effects, &self.display, &self.locker, self.sound.as_ref());
    }
}
