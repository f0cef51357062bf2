//! TOML-based CLI configuration.
//!
//! Read from `goaltrack.toml` in the working directory unless `--config`
//! points elsewhere. Every key is optional.

use std::path::{Path, PathBuf};

use anyhow::Context;
use goaltrack_progress::TrackerConfig;
use serde::{Deserialize, Serialize};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "goaltrack.toml";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the JSON store lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Owner used when `--user` is not given
    #[serde(default = "default_user")]
    pub user: String,

    /// Fallback log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Progress engine settings
    #[serde(default)]
    pub tracker: TrackerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".goaltrack")
}

fn default_user() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            user: default_user(),
            log_level: default_log_level(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or the default file. A missing file gives defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).with_context(|| format!("invalid config {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("cannot read config {}", path.display())),
        }
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
