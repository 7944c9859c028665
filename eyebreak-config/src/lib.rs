pub mod config;
pub mod error;
pub mod store;
pub mod template;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use store::{ConfigStore, Loaded, CONFIG_FILENAME};
pub use template::{render, Arg};
