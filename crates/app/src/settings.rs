//! Handles settings for the application.
//!
//! Sources, lowest priority first: the TOML file (`config/clipit.toml` unless
//! `--config` says otherwise, optional), `CLIPIT_*` environment variables,
//! then explicit command line flags.
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/clipit";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./clipit.db?mode=rwc".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("CLIPIT"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
