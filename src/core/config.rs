//! Builder configuration
//!
//! Where roster data comes from, where the game catalog lives, and which
//! language names are displayed in. Loaded from TOML, every field optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{BuilderError, Result};
use crate::core::types::DEFAULT_LANGUAGE;

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "OWB_CONFIG";

/// Roster directory used when no source is configured
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where rosters are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterLocation {
    Remote(String),
    Local(PathBuf),
}

/// Configuration for roster loading and display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Base URL of the roster data server
    ///
    /// Rosters are fetched from `<data_url>/games/<game>/<army>.json`.
    /// Mutually exclusive with `data_dir`.
    pub data_url: Option<String>,

    /// Local directory with the same `games/<game>/<army>.json` layout
    ///
    /// `data/` is used when neither source is set.
    pub data_dir: Option<PathBuf>,

    /// Game system catalog (list of games and their armies)
    pub catalog_path: PathBuf,

    /// Language used for unit and army names
    ///
    /// Names missing in this language fall back to English.
    pub language: String,

    /// Timeout for a single roster request
    pub request_timeout_secs: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            data_url: None,
            data_dir: None,
            catalog_path: PathBuf::from("data/armies.json"),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl BuilderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BuilderConfig = toml::from_str(content)?;
        config.validate().map_err(BuilderError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `$OWB_CONFIG` if set, otherwise use defaults
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Resolve the configured roster source
    pub fn roster_location(&self) -> RosterLocation {
        match (&self.data_url, &self.data_dir) {
            (Some(url), _) => RosterLocation::Remote(url.clone()),
            (None, Some(dir)) => RosterLocation::Local(dir.clone()),
            (None, None) => RosterLocation::Local(PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.data_url.is_some() && self.data_dir.is_some() {
            return Err("data_url and data_dir are mutually exclusive".into());
        }

        if let Some(url) = &self.data_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("data_url must be an http(s) URL, got {}", url));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be positive".into());
        }

        if self.language.trim().is_empty() {
            return Err("language must not be empty".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<BuilderConfig> = OnceLock::new();

/// Get the global builder config (initializes with defaults if not set)
pub fn config() -> &'static BuilderConfig {
    CONFIG.get_or_init(BuilderConfig::default)
}

/// Set the global builder config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: BuilderConfig) -> std::result::Result<(), BuilderConfig> {
    CONFIG.set(config)
}
