//! `tripstats config` subcommand for viewing and editing settings

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::services::{Settings, SettingsService};
use crate::types::{Result, TripstatsError};

/// Show or update settings
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Default trip snapshot file or directory
    #[arg(long, value_name = "PATH")]
    pub trips_path: Option<PathBuf>,

    /// Default logging filter (e.g. "tripstats=info")
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Clear all stored settings before applying the flags
    #[arg(long)]
    pub reset: bool,
}

impl ConfigArgs {
    /// Apply the flags to `settings`; returns whether anything changed
    pub fn apply(&self, settings: &mut Settings) -> bool {
        let mut changed = false;

        if self.reset && *settings != Settings::default() {
            *settings = Settings::default();
            changed = true;
        }

        if let Some(path) = &self.trips_path {
            settings.trips_path = Some(path.clone());
            changed = true;
        }

        if let Some(filter) = &self.log_filter {
            settings.log_filter = Some(filter.clone());
            changed = true;
        }

        changed
    }

    /// Apply the flags and save; `--reset` never reads the stored file
    pub fn run(self, service: &SettingsService) -> Result<()> {
        let mut settings = if self.reset {
            Settings::default()
        } else {
            service.load()?
        };

        if self.apply(&mut settings) || self.reset {
            service.save(&settings)?;
            info!("Saved settings to {}", service.config_path().display());
        }

        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| TripstatsError::Parse(e.to_string()))?;
        println!("{}", json);

        Ok(())
    }
}
