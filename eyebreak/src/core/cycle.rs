use std::path::PathBuf;
use std::time::Duration;

use eyebreak_config::{Config, ConfigError};

use super::{Scheduler, Size, TimerId};
use crate::effect::Effect;
use crate::event::TimerEvent;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const LOCK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Paused,
    Breaking,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleState {
    pub phase: Phase,
    /// Seconds left until the next break. Only advances while counting.
    pub remaining_seconds: u64,
    pub screen_size: Size,
}

/// The break-cycle state machine.
///
/// Pure with respect to the outside world: every transition mutates
/// [`CycleState`], arms timers on the internal virtual-clock scheduler, and
/// returns the effects the caller has to apply.
pub struct BreakCycle {
    config: Config,
    break_after: u64,
    break_duration: u64,
    title: String,
    paused_title: String,
    state: CycleState,
    scheduler: Scheduler<TimerEvent>,
    tick_timer: Option<TimerId>,
}

impl BreakCycle {
    pub fn new(config: Config, screen_size: Size) -> Result<Self, ConfigError> {
        config.validate()?;
        let title = config.render_title(false)?;
        let paused_title = config.render_title(true)?;
        let break_after = config.break_after();
        let break_duration = config.break_duration();

        Ok(Self {
            config,
            break_after,
            break_duration,
            title,
            paused_title,
            state: CycleState {
                phase: Phase::Counting,
                remaining_seconds: break_after,
                screen_size,
            },
            scheduler: Scheduler::new(),
            tick_timer: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    #[cfg(test)]
    pub fn state(&self) -> &CycleState {
        &self.state
    }

    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Percentage of the counting interval already elapsed.
    pub fn progress(&self) -> f64 {
        let elapsed = self.break_after - self.state.remaining_seconds;
        elapsed as f64 / self.break_after as f64 * 100.0
    }

    /// Initial window setup and the first tick.
    pub fn start(&mut self) -> Vec<Effect> {
        tracing::info!(
            "Break cycle started: break every {}s for {}s",
            self.break_after,
            self.break_duration
        );
        let mut effects = vec![
            Effect::SetTitle(self.title.clone()),
            Effect::SetPauseButton {
                enabled: true,
                label: self.config.pause_label.clone(),
            },
            Effect::SetProgress(self.progress()),
            self.countdown_text(),
            Effect::MoveWindowTo { x: 0, y: 0 },
            Effect::SetTopmost(self.config.always_on_top),
            Effect::FocusPauseButton,
        ];
        if self.config.minimize_while_counting {
            effects.push(Effect::Minimize);
        } else {
            effects.push(Effect::Restore);
        }
        self.arm_tick();
        effects
    }

    /// The pause button.
    pub fn toggle_pause(&mut self) -> Vec<Effect> {
        match self.state.phase {
            Phase::Counting => self.pause(),
            Phase::Paused => self.unpause(),
            Phase::Breaking => {
                tracing::debug!("Pause ignored: pause control is disabled during a break");
                vec![]
            }
        }
    }

    pub fn pause(&mut self) -> Vec<Effect> {
        if self.state.phase != Phase::Counting {
            tracing::debug!("Pause ignored in phase {:?}", self.state.phase);
            return vec![];
        }
        self.state.phase = Phase::Paused;
        tracing::info!("Paused with {}s remaining", self.state.remaining_seconds);
        vec![
            Effect::SetTitle(self.paused_title.clone()),
            Effect::SetPauseButton {
                enabled: true,
                label: self.config.unpause_label.clone(),
            },
            Effect::SetTopmost(self.config.on_top_while_paused),
            Effect::FocusPauseButton,
        ]
    }

    pub fn unpause(&mut self) -> Vec<Effect> {
        if self.state.phase != Phase::Paused {
            tracing::debug!("Unpause ignored in phase {:?}", self.state.phase);
            return vec![];
        }
        self.state.phase = Phase::Counting;
        tracing::info!("Resumed with {}s remaining", self.state.remaining_seconds);
        vec![
            Effect::SetTitle(self.title.clone()),
            Effect::SetPauseButton {
                enabled: true,
                label: self.config.pause_label.clone(),
            },
            Effect::SetTopmost(self.config.always_on_top),
            Effect::FocusPauseButton,
        ]
    }

    /// Fires every timer due at or before `now`, in deadline order.
    pub fn advance(&mut self, now: Duration) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some((id, event)) = self.scheduler.pop_due(now) {
            tracing::trace!("Timer {:?} fired: {:?}", id, event);
            match event {
                TimerEvent::Tick => {
                    self.tick_timer = None;
                    self.on_tick(&mut effects);
                }
                TimerEvent::LockScreen => effects.push(Effect::LockScreen),
                TimerEvent::BreakEnd => self.on_break_end(&mut effects),
            }
        }
        self.scheduler.advance_to(now);
        effects
    }

    /// Drops every pending timer.
    pub fn shutdown(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.tick_timer = None;
        tracing::debug!("Cancelled {} pending timers", cancelled);
    }

    fn on_tick(&mut self, effects: &mut Vec<Effect>) {
        match self.state.phase {
            Phase::Paused => {
                self.arm_tick();
            }
            Phase::Counting => {
                self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
                if self.state.remaining_seconds == 0 {
                    self.state.remaining_seconds = self.break_after;
                    self.enter_break(effects);
                    return;
                }
                effects.push(Effect::SetProgress(self.progress()));
                effects.push(self.countdown_text());
                self.arm_tick();
            }
            Phase::Breaking => {
                tracing::warn!("Stale tick during a break ignored");
            }
        }
    }

    fn enter_break(&mut self, effects: &mut Vec<Effect>) {
        self.state.phase = Phase::Breaking;
        tracing::info!("Break started for {}s", self.break_duration);

        if self.config.minimize_while_counting {
            effects.push(Effect::Restore);
        }
        effects.push(Effect::SetProgress(100.0));
        effects.push(Effect::SetPauseButton {
            enabled: false,
            label: self.config.pause_label.clone(),
        });
        effects.push(Effect::SetBreakText(self.config.break_text.clone()));
        effects.push(Effect::CenterWindow {
            screen: self.state.screen_size,
            offset: self.config.popup_offset,
        });
        effects.push(Effect::Raise);
        if !self.config.always_on_top {
            effects.push(Effect::SetTopmost(true));
        }
        effects.push(Effect::FocusLabel);

        // Armed before the break end so a one-second break still locks first.
        if self.config.lock_screen_enabled {
            self.scheduler
                .schedule_after(LOCK_DELAY, TimerEvent::LockScreen);
        }
        self.scheduler.schedule_after(
            Duration::from_secs(self.break_duration),
            TimerEvent::BreakEnd,
        );

        effects.push(Effect::PlaySound(PathBuf::from(
            &self.config.sound_break_start,
        )));
    }

    fn on_break_end(&mut self, effects: &mut Vec<Effect>) {
        effects.push(Effect::PlaySound(PathBuf::from(&self.config.sound_break_end)));

        self.state.phase = Phase::Counting;
        self.state.remaining_seconds = self.break_after;
        tracing::info!("Break finished, next break in {}s", self.break_after);

        if !self.config.always_on_top {
            effects.push(Effect::SetTopmost(false));
        }
        effects.push(Effect::SetPauseButton {
            enabled: true,
            label: self.config.pause_label.clone(),
        });
        effects.push(Effect::SetProgress(self.progress()));
        effects.push(self.countdown_text());
        effects.push(Effect::MoveWindowTo { x: 0, y: 0 });
        if self.config.minimize_while_counting {
            effects.push(Effect::Minimize);
        }
        self.arm_tick();
    }

    fn arm_tick(&mut self) {
        if let Some(stale) = self.tick_timer.take() {
            self.scheduler.cancel(stale);
        }
        self.tick_timer = Some(self.scheduler.schedule_after(TICK_INTERVAL, TimerEvent::Tick));
    }

    fn countdown_text(&self) -> Effect {
        let remaining = self.state.remaining_seconds;
        Effect::SetCountdownText {
            minutes: remaining / 60,
            seconds: remaining % 60,
        }
    }
}
