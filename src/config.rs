use std::{path::PathBuf, sync::OnceLock};

use config::{Config, File};
use thiserror::Error;

use crate::notation::NotationStyle;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read the configuration file: {0}")]
    UnableToReadConfig(#[from] config::ConfigError),
}

/// Configuration of the binary.
///
/// Only rendering choices live here; the rules never consult the configuration.
#[derive(Debug, serde::Deserialize)]
pub struct FerriteConfig {
    /// Suffix appended to a move that gives check.
    #[serde(default = "default_check_suffix")]
    pub check_suffix: String,

    /// Suffix appended to a move that gives checkmate. The historical default is "++"; set it to
    /// "#" for the conventional mate marker.
    #[serde(default = "default_checkmate_suffix")]
    pub checkmate_suffix: String,
}

fn default_check_suffix() -> String {
    "+".to_string()
}

fn default_checkmate_suffix() -> String {
    "++".to_string()
}

impl Default for FerriteConfig {
    fn default() -> Self {
        Self {
            check_suffix: default_check_suffix(),
            checkmate_suffix: default_checkmate_suffix(),
        }
    }
}

impl FerriteConfig {
    /// Returns the notation style described by the configuration.
    pub fn notation_style(&self) -> NotationStyle {
        NotationStyle {
            check_suffix: self.check_suffix.clone(),
            checkmate_suffix: self.checkmate_suffix.clone(),
        }
    }
}

static CONFIG: OnceLock<FerriteConfig> = OnceLock::new();

/// Get the configuration of the binary.
pub fn get_config() -> &'static FerriteConfig {
    CONFIG.get().expect("the configuration should have been initialized")
}

/// Initialize the configuration of the binary.
///
/// When no path is given the defaults are used.
pub fn initialize(path: Option<PathBuf>) -> Result<(), ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }
    let config: FerriteConfig = builder.build()?.try_deserialize()?;
    CONFIG.set(config).expect("it should be possible to initialize the configuration");

    Ok(())
}
