//! Greeter Settings

use crate::error::GreeterError;
use chrono::NaiveDateTime;
use config::{Config, Environment, File, FileFormat, Source};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default settings file, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "greeter.toml";

/// Greeter settings
///
/// Layered as built-in defaults, then an optional TOML file, then
/// `GREETER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreeterSettings {
    /// Max tracing level (default: "info")
    pub log_level: String,
    /// Pin the clock to this local time instead of reading the system clock
    pub fixed_time: Option<NaiveDateTime>,
}

impl Default for GreeterSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_time: None,
        }
    }
}

impl GreeterSettings {
    /// Load settings from `path`. A missing file leaves the defaults in place.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GreeterError> {
        let file = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        Self::from_source(file)
    }

    fn from_source<S>(file: S) -> Result<Self, GreeterError>
    where
        S: Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        let config = Config::builder()
            .set_default("log_level", defaults.log_level)?
            .add_source(file)
            .add_source(Environment::with_prefix("GREETER"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
