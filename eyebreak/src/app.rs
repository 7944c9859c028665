mod controller;
mod effects;
mod event_loop;
mod input;

use std::path::Path;

use anyhow::{Context, Result};
use eyebreak_config::ConfigStore;

use crate::console::ConsoleDisplay;
use crate::system::{CommandSoundPlayer, SystemScreenLocker};

use controller::Controller;

pub struct App {}

impl App {
    pub fn run(config_path: &Path) -> Result<()> {
        let store = ConfigStore::new(config_path);
        let loaded = store
            .load()
            .with_context(|| format!("Failed to load configuration from {:?}", store.path()))?;
        if loaded.persisted {
            tracing::info!("Configuration written to {:?}", store.path());
        }
        let config = loaded.config;

        let display = ConsoleDisplay::new(&config);
        let locker = SystemScreenLocker::from_config(&config);
        let sound = CommandSoundPlayer::detect();
        let controller = Controller::new(config, display, locker, sound)?;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        let result = rt.block_on(event_loop::run(controller));

        // The stdin reader blocks on a thread that cannot be cancelled.
        rt.shutdown_background();
        result
    }
}
