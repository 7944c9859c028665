mod app;
mod console;
mod core;
mod effect;
mod event;
mod platform;
mod system;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use eyebreak_config::{ConfigStore, CONFIG_FILENAME};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// EyeBreak - reminds you to rest your eyes
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    CheckConfig(CheckConfigCmd),
    Version(VersionCmd),
}

/// Run the break reminder
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {
    /// configuration file (default: eyebreak_config.json)
    #[argh(option, default = "PathBuf::from(CONFIG_FILENAME)")]
    config: PathBuf,
}

/// Load, backfill and validate the configuration file
#[derive(FromArgs)]
#[argh(subcommand, name = "check-config")]
struct CheckConfigCmd {
    /// configuration file (default: eyebreak_config.json)
    #[argh(option, default = "PathBuf::from(CONFIG_FILENAME)")]
    config: PathBuf,
}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        // No subcommand runs the reminder with the default file.
        None => start(PathBuf::from(CONFIG_FILENAME)),
        Some(SubCommand::Start(cmd)) => start(cmd.config),
        Some(SubCommand::CheckConfig(cmd)) => {
            init_tracing();
            check_config(cmd.config)
        }
        Some(SubCommand::Version(_)) => {
            println!("eyebreak {}", VERSION);
            Ok(())
        }
    }
}

fn start(config: PathBuf) -> Result<()> {
    init_tracing();
    tracing::info!("eyebreak {} starting", VERSION);
    app::App::run(&config)
}

// Logs go to stderr; stdout carries the status line.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn check_config(path: PathBuf) -> Result<()> {
    let store = ConfigStore::new(path);
    let loaded = match store.load() {
        Ok(loaded) => loaded,
        Err(e) if e.is_invalid_configuration() => {
            bail!("Configuration {:?} is invalid: {}", store.path(), e)
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read configuration {:?}", store.path()))
        }
    };
    let config = loaded.config;

    println!("Configuration: {}", store.path().display());
    if loaded.persisted {
        println!("  (written with defaults for missing keys)");
    }
    println!(
        "  countdown:      {}",
        config.render_countdown(config.break_after() / 60, config.break_after() % 60)?
    );
    println!("  break message:  {}", config.break_text);
    println!("  title:          {}", config.render_title(false)?);
    println!("  paused title:   {}", config.render_title(true)?);
    println!("  break after:    {}s", config.break_after());
    println!("  break duration: {}s", config.break_duration());
    println!("  always on top:  {}", config.always_on_top);
    println!("  popup offset:   {:?}", config.popup_offset);
    if config.lock_screen_enabled {
        println!("  lock command:   {}", config.lock_command);
    } else {
        println!("  lock command:   disabled");
    }
    println!("  start sound:    {}", config.sound_break_start);
    println!("  end sound:      {}", config.sound_break_end);
    Ok(())
}
