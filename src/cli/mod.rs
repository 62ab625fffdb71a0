mod config;
pub mod output;

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use crate::logging;
use crate::parsers::TripSnapshotLoader;
use crate::services::dates::local_now;
use crate::services::{
    format_distance, format_duration, parse_distance, parse_duration, Settings, SettingsService,
    TripAggregator, TripStatsReport,
};
use crate::types::{Trip, TripstatsError};

pub use config::ConfigArgs;
use output::{CostsOutput, StatusOutput, TripDetail};

/// Dashboard statistics for travel-planning trip snapshots
#[derive(Parser)]
#[command(name = "tripstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Trip snapshot file or directory (defaults to the configured path)
    #[arg(long, global = true, value_name = "PATH")]
    trips: Option<PathBuf>,

    /// Evaluate dates as of this day (YYYY-MM-DD) instead of now
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full dashboard report (default)
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show planned costs by category
    Costs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show past/live/incoming counts with the next and longest trip
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show planned costs and travel totals for one trip
    Trip {
        /// Trip id (or tripId)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a distance string such as "1,275 km"
    ParseDistance { text: String },

    /// Parse a duration string such as "12 hours 25 mins"
    ParseDuration { text: String },

    /// Show or update settings
    Config(ConfigArgs),
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let settings_service = SettingsService::new().ok();
        let (settings, settings_err) = load_settings(settings_service.as_ref());

        let env_filter = std::env::var("RUST_LOG").ok();
        logging::init(&logging::resolve_filter(
            self.verbose,
            env_filter.as_deref(),
            settings.log_filter.as_deref(),
        ));
        if let Some(e) = settings_err {
            warn!("Ignoring stored settings: {}", e);
        }

        let now = self.now();
        debug!(%now, "evaluating trips");

        match self.command {
            None => {
                let trips = load_trips(self.trips, &settings)?;
                print_summary(&trips, now, false)
            }
            Some(Commands::Summary { json }) => {
                let trips = load_trips(self.trips, &settings)?;
                print_summary(&trips, now, json)
            }
            Some(Commands::Costs { json }) => {
                let trips = load_trips(self.trips, &settings)?;
                let breakdown = TripAggregator::planned_costs_breakdown(&trips);
                let total = TripAggregator::total_planned_costs(&trips);
                if json {
                    let out = CostsOutput { breakdown, total };
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    println!("{}", output::render_costs(&breakdown, total));
                }
                Ok(())
            }
            Some(Commands::Status { json }) => {
                let trips = load_trips(self.trips, &settings)?;
                let report = TripStatsReport::from_trips(&trips, now);
                if json {
                    let out = StatusOutput {
                        totals: report.status,
                        next_trip: report.next_trip,
                        longest_trip: report.longest_trip,
                    };
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    println!(
                        "{}",
                        output::render_status(
                            &report.status,
                            report.next_trip.as_ref(),
                            report.longest_trip.as_ref()
                        )
                    );
                }
                Ok(())
            }
            Some(Commands::Trip { id, json }) => {
                let trips = load_trips(self.trips, &settings)?;
                let Some(trip) = find_trip(&trips, &id) else {
                    bail!("trip not found: {}", id);
                };
                let detail = TripDetail::from_trip(trip);
                if json {
                    println!("{}", serde_json::to_string_pretty(&detail)?);
                } else {
                    println!("{}", output::render_trip(&detail));
                }
                Ok(())
            }
            Some(Commands::ParseDistance { text }) => {
                let meters = parse_distance(Some(&text));
                println!("{} m ({})", meters, format_distance(meters));
                Ok(())
            }
            Some(Commands::ParseDuration { text }) => {
                let minutes = parse_duration(Some(&text));
                println!("{} min ({})", minutes, format_duration(minutes));
                Ok(())
            }
            Some(Commands::Config(args)) => {
                let service = settings_service
                    .context("cannot locate settings directory (no home directory)")?;
                args.run(&service)?;
                Ok(())
            }
        }
    }

    /// Start of `--today`, or the local clock
    fn now(&self) -> NaiveDateTime {
        self.today
            .map(|day| day.and_time(NaiveTime::MIN))
            .unwrap_or_else(local_now)
    }
}

/// Stored settings, or defaults plus the error when the file is unreadable
fn load_settings(service: Option<&SettingsService>) -> (Settings, Option<TripstatsError>) {
    match service.map(SettingsService::load) {
        Some(Ok(settings)) => (settings, None),
        Some(Err(e)) => (Settings::default(), Some(e)),
        None => (Settings::default(), None),
    }
}

/// Resolve the snapshot path (`--trips`, then settings) and load it
fn load_trips(flag: Option<PathBuf>, settings: &Settings) -> Result<Vec<Trip>, TripstatsError> {
    let path = flag.or_else(|| settings.trips_path.clone()).ok_or_else(|| {
        TripstatsError::Config(
            "no trip snapshot given; pass --trips PATH or run `tripstats config --trips-path PATH`"
                .into(),
        )
    })?;

    info!("Loading trips from {}", path.display());
    TripSnapshotLoader::new(path).load()
}

/// First trip whose `id` or `tripId` equals `id`
fn find_trip<'a>(trips: &'a [Trip], id: &str) -> Option<&'a Trip> {
    trips
        .iter()
        .find(|t| t.id.as_deref() == Some(id) || t.trip_id.as_deref() == Some(id))
}

fn print_summary(trips: &[Trip], now: NaiveDateTime, json: bool) -> anyhow::Result<()> {
    let report = TripStatsReport::from_trips(trips, now);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::render_summary(&report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["tripstats"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.trips.is_none());
    }

    #[test]
    fn test_cli_parse_summary_json() {
        let cli = Cli::try_parse_from(["tripstats", "summary", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { json: true })));
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tripstats",
            "costs",
            "--trips",
            "trips.json",
            "--today",
            "2024-05-15",
            "-v",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Costs { json: false })));
        assert_eq!(cli.trips, Some(PathBuf::from("trips.json")));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 5, 15));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_invalid_today() {
        assert!(Cli::try_parse_from(["tripstats", "--today", "15/05/2024"]).is_err());
    }

    #[test]
    fn test_cli_parse_trip_id() {
        let cli = Cli::try_parse_from(["tripstats", "trip", "abc"]).unwrap();
        match cli.command {
            Some(Commands::Trip { id, json }) => {
                assert_eq!(id, "abc");
                assert!(!json);
            }
            _ => panic!("expected trip command"),
        }
    }

    #[test]
    fn test_cli_parse_parse_distance() {
        let cli = Cli::try_parse_from(["tripstats", "parse-distance", "1,275 km"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ParseDistance { .. })));
    }

    #[test]
    fn test_cli_parse_config() {
        let cli =
            Cli::try_parse_from(["tripstats", "config", "--trips-path", "/data/trips"]).unwrap();
        match cli.command {
            Some(Commands::Config(args)) => {
                assert_eq!(args.trips_path, Some(PathBuf::from("/data/trips")));
                assert!(!args.reset);
            }
            _ => panic!("expected config command"),
        }
    }

    #[test]
    fn test_now_uses_today_flag() {
        let cli = Cli::try_parse_from(["tripstats", "--today", "2024-05-15"]).unwrap();
        assert_eq!(
            cli.now(),
            NaiveDate::from_ymd_opt(2024, 5, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_load_settings_falls_back_on_corrupt_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = SettingsService::with_dir(dir.path().to_path_buf());
        std::fs::write(service.config_path(), "{not json").unwrap();

        let (settings, err) = load_settings(Some(&service));
        assert_eq!(settings, Settings::default());
        assert!(matches!(err, Some(TripstatsError::Config(_))));
    }

    #[test]
    fn test_load_settings_reads_stored_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = SettingsService::with_dir(dir.path().to_path_buf());
        let stored = Settings {
            trips_path: Some(PathBuf::from("/data/trips")),
            log_filter: None,
        };
        service.save(&stored).unwrap();

        let (settings, err) = load_settings(Some(&service));
        assert_eq!(settings, stored);
        assert!(err.is_none());
        assert_eq!(load_settings(None).0, Settings::default());
    }

    #[test]
    fn test_find_trip_matches_id_or_trip_id() {
        let trips = vec![
            Trip {
                id: Some("1".into()),
                trip_id: Some("lisbon-2024".into()),
                name: "Lisbon".into(),
                ..Default::default()
            },
            Trip {
                trip_id: Some("porto".into()),
                name: "Porto".into(),
                ..Default::default()
            },
        ];

        assert_eq!(find_trip(&trips, "1").map(|t| t.name.as_str()), Some("Lisbon"));
        assert_eq!(
            find_trip(&trips, "lisbon-2024").map(|t| t.name.as_str()),
            Some("Lisbon")
        );
        assert_eq!(find_trip(&trips, "porto").map(|t| t.name.as_str()), Some("Porto"));
        assert!(find_trip(&trips, "madrid").is_none());
    }

    #[test]
    fn test_load_trips_requires_path() {
        let err = load_trips(None, &Settings::default()).unwrap_err();
        assert!(matches!(err, TripstatsError::Config(_)));
    }

    #[test]
    fn test_load_trips_falls_back_to_settings() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trips.json");
        std::fs::write(&path, r#"[{"id": "1", "name": "Lisbon"}]"#).unwrap();

        let settings = Settings {
            trips_path: Some(path),
            log_filter: None,
        };
        let trips = load_trips(None, &settings).unwrap();
        assert_eq!(trips.len(), 1);
    }
}
