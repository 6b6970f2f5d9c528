use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Storage-related settings: everything except the data directory, which is
/// supplied on the command line rather than in the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
        }
    }
}

/// Top-level engine configuration, loaded from `<dbenv-path>/minidb.toml` if present.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Failures reading or parsing the engine's TOML config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl EngineConfig {
    /// Loads the config at `path`, or the default configuration if no file exists
    /// there.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
