use std::path::PathBuf;

use catalog::{CatalogError, Tables};

use crate::config::EngineConfig;

/// Owns the engine's configuration and its lazily-bootstrapped catalog. Lives for
/// the duration of the process; the catalog is constructed on first use.
#[derive(Debug)]
pub struct EngineEnvironment {
    data_dir: PathBuf,
    config: EngineConfig,
    catalog: Option<Tables>,
}

impl EngineEnvironment {
    /// Prepares the database environment rooted at `data_dir`, creating the
    /// directory if it does not already exist. The catalog itself is not opened yet.
    pub fn new(data_dir: PathBuf, config: EngineConfig) -> std::io::Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            config,
            catalog: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the catalog, opening (and seeding, if this is a fresh environment) it
    /// on first call.
    pub fn catalog(&mut self) -> Result<&mut Tables, CatalogError> {
        if self.catalog.is_none() {
            self.catalog = Some(Tables::open(&self.data_dir)?);
        }
        Ok(self.catalog.as_mut().expect("just initialized above"))
    }
}
