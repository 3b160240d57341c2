//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON file. A missing file means
//! "use the defaults"; fields absent from the file take their default
//! values. Loaded and saved configs are always validated.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Config: {} not found, using defaults",
                    self.path.display()
                );
                return Ok(SystemConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let cfg: SystemConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        cfg.validate()?;
        info!("Config: loaded {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        fs::write(&self.path, json)?;
        info!("Config: saved {}", self.path.display());
        Ok(())
    }
}
