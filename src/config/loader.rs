use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::TerminalConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read rawline config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rawline config {} is not valid TOML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("history_capacity is {0}; it must hold at least one entry")]
    Validation(usize),
}

impl TerminalConfig {
    /// `<config dir>/rawline/config.toml`, relative to the working directory
    /// when the platform has no config dir.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_default()
            .join("rawline")
            .join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields `TerminalConfig::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: TerminalConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Validation(self.history_capacity));
        }
        Ok(())
    }
}
