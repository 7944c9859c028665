use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{ConfigError, Result};

pub const CONFIG_FILENAME: &str = "eyebreak_config.json";

/// Result of loading the configuration file.
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    /// Whether the file was created or rewritten during the load.
    pub persisted: bool,
}

/// JSON-backed configuration file with default backfilling.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, merging file values over the defaults.
    ///
    /// A missing file is created with the defaults. A file lacking any known
    /// key is rewritten with the backfilled values; keys the schema does not
    /// know are kept as they are.
    pub fn load(&self) -> Result<Loaded> {
        let defaults = default_map(&self.path)?;

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No configuration at {:?}, writing defaults", self.path);
                self.write(&defaults)?;
                let config = Config::default();
                config.validate()?;
                return Ok(Loaded {
                    config,
                    persisted: true,
                });
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let from_file: Map<String, Value> =
            serde_json::from_str(&data).map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        let missing: Vec<&String> = defaults
            .keys()
            .filter(|key| !from_file.contains_key(*key))
            .collect();
        let persisted = !missing.is_empty();
        if persisted {
            tracing::info!("Backfilling missing configuration keys: {:?}", missing);
        }

        let mut merged = defaults.clone();
        merged.extend(from_file);

        if persisted {
            self.write(&merged)?;
        }

        let config: Config =
            serde_json::from_value(Value::Object(merged)).map_err(|source| {
                ConfigError::Malformed {
                    path: self.path.clone(),
                    source,
                }
            })?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {:?}", self.path);
        Ok(Loaded { config, persisted })
    }

    fn write(&self, map: &Map<String, Value>) -> Result<()> {
        let mut text = serde_json::to_string_pretty(map).map_err(|source| {
            ConfigError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        text.push('\n');
        fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!("Configuration saved to {:?}", self.path);
        Ok(())
    }
}

fn default_map(path: &Path) -> Result<Map<String, Value>> {
    to_map(&Config::default(), path)
}

fn to_map(config: &Config, path: &Path) -> Result<Map<String, Value>> {
    match serde_json::to_value(config) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::invalid("<root>", "configuration is not an object")),
        Err(source) => Err(ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        }),
    }
}
