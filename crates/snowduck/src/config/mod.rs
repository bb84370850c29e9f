//! YAML configuration.

mod types;
mod validation;

pub use types::{Config, DuckDbConfig, Engine, SnowflakeConfig};

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}
