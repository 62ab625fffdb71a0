//! User settings service
//!
//! Settings live in `~/.tripstats/config.json`. A missing file means
//! defaults; command-line flags take precedence over anything stored here.

use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::types::{Result, TripstatsError};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Snapshot file or directory used when `--trips` is not given
    #[serde(default)]
    pub trips_path: Option<PathBuf>,
    /// tracing directive, e.g. "tripstats=debug"
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Service for reading and writing the settings file
pub struct SettingsService {
    config_dir: PathBuf,
}

impl SettingsService {
    /// Create a service using the default directory (`~/.tripstats/`)
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| TripstatsError::Config("Cannot determine home directory".into()))?;
        Ok(Self {
            config_dir: base_dirs.home_dir().join(".tripstats"),
        })
    }

    /// Create a service with a custom directory (for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load(&self) -> Result<Settings> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| {
            TripstatsError::Config(format!("Invalid settings file {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| TripstatsError::Config(format!("Failed to serialize settings: {}", e)))?;
        fs::write(self.config_path(), content)?;
        Ok(())
    }
}
