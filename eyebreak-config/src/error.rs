use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("Template error in {template:?}: {message}")]
    Template { template: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }

    /// True for errors that come from the configuration contents rather than
    /// from the filesystem.
    pub fn is_invalid_configuration(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}
