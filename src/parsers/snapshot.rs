//! Trip snapshot loader
//!
//! Snapshots are JSON exports of the backend's trip list, either a bare
//! array or `{ "trips": [...] }`. A directory of snapshots is parsed in
//! parallel and merged.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Result, Trip, TripstatsError};

/// Glob pattern for snapshot files inside a directory
const SNAPSHOT_PATTERN: &str = "*.json";

/// Loads trips from a snapshot file or a directory of snapshots
pub struct TripSnapshotLoader {
    path: PathBuf,
}

impl TripSnapshotLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot files to read, sorted by path
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        if !self.path.is_dir() {
            return Err(TripstatsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("trip snapshot not found: {}", self.path.display()),
            )));
        }

        let dir = glob::Pattern::escape(&self.path.to_string_lossy());
        let pattern = Path::new(&dir).join(SNAPSHOT_PATTERN);
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| {
                paths
                    .filter_map(|e| e.ok())
                    .filter(|p| p.is_file())
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        Ok(files)
    }

    /// Load and deduplicate trips.
    ///
    /// A single requested file must parse; inside a directory, unreadable
    /// files are skipped with a warning.
    pub fn load(&self) -> Result<Vec<Trip>> {
        let files = self.collect_files()?;

        if self.path.is_file() {
            let trips = Self::parse_file(&self.path)?;
            return Ok(dedup_trips(trips));
        }

        let per_file: Vec<Vec<Trip>> = files
            .par_iter()
            .map(|f| match Self::parse_file(f) {
                Ok(trips) => trips,
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", f, e);
                    Vec::new()
                }
            })
            .collect();

        let trips: Vec<Trip> = per_file.into_iter().flatten().collect();
        debug!(
            files = files.len(),
            trips = trips.len(),
            "loaded trip snapshots"
        );
        Ok(dedup_trips(trips))
    }

    /// Parse a single snapshot file
    pub fn parse_file(path: &Path) -> Result<Vec<Trip>> {
        let mut bytes = fs::read(path)?;
        Self::parse_bytes(&mut bytes)
            .map_err(|e| TripstatsError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Parse snapshot JSON; the buffer is used as scratch space by the parser
    pub fn parse_bytes(bytes: &mut [u8]) -> Result<Vec<Trip>> {
        let value: Value =
            simd_json::from_slice(bytes).map_err(|e| TripstatsError::Parse(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("trips") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(TripstatsError::Parse(
                        "expected a \"trips\" array in snapshot object".into(),
                    ))
                }
            },
            _ => {
                return Err(TripstatsError::Parse(
                    "expected a JSON array of trips".into(),
                ))
            }
        };

        let mut trips = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Trip>(item) {
                Ok(trip) => trips.push(trip),
                Err(e) => warn!("Skipping unreadable trip #{}: {}", index, e),
            }
        }
        Ok(trips)
    }
}

/// Drop repeated trips by `id`/`tripId`; first occurrence wins, unkeyed trips stay
pub fn dedup_trips(trips: Vec<Trip>) -> Vec<Trip> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut deduped: Vec<Trip> = Vec::with_capacity(trips.len());

    for trip in trips {
        match trip.key() {
            Some(key) => {
                if seen.insert(key.to_string()) {
                    deduped.push(trip);
                }
            }
            None => deduped.push(trip),
        }
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    // ========== parse_bytes ==========

    #[test]
    fn test_parse_bare_array() {
        let mut json = br#"[{"id": "1", "name": "Lisbon"}, {"id": 2, "name": "Porto"}]"#.to_vec();
        let trips = TripSnapshotLoader::parse_bytes(&mut json).unwrap();

        assert_eq!(trips.len(), 2);
        assert_eq!(trips[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_wrapped_object() {
        let mut json = br#"{"trips": [{"name": "Lisbon", "budget": 900}]}"#.to_vec();
        let trips = TripSnapshotLoader::parse_bytes(&mut json).unwrap();

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].budget, Some(900.0));
    }

    #[test]
    fn test_parse_nested_records() {
        let mut json = br#"[{
            "name": "Road trip",
            "startDate": "2024-01-01",
            "endDate": "2024-01-03",
            "accommodations": [{
                "name": "Inn", "address": "A", "latitude": "1.0", "longitude": "2.0",
                "checkInDate": "2024-01-01", "checkOutDate": "2024-01-03",
                "priceForAdult": 100
            }],
            "activityList": [{"id": 1, "name": "Dinner", "category": "food", "cost": 50,
                              "activityDate": "2024-01-02T19:00:00"}],
            "travelList": [{"transport": "car", "distance": "50 km", "estimatedCost": "100",
                            "estimatedDuration": "45 min"}]
        }]"#
        .to_vec();
        let trips = TripSnapshotLoader::parse_bytes(&mut json).unwrap();

        let trip = &trips[0];
        assert_eq!(trip.accommodations().len(), 1);
        assert_eq!(trip.activities()[0].cost, Some(50.0));
        assert_eq!(trip.travels()[0].distance.as_deref(), Some("50 km"));
    }

    #[test]
    fn test_parse_skips_non_object_items() {
        let mut json = br#"[{"name": "ok"}, 42, "text", null]"#.to_vec();
        let trips = TripSnapshotLoader::parse_bytes(&mut json).unwrap();
        assert_eq!(trips.len(), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let mut json = br#"{"items": []}"#.to_vec();
        assert!(matches!(
            TripSnapshotLoader::parse_bytes(&mut json),
            Err(TripstatsError::Parse(_))
        ));

        let mut json = br#""just a string""#.to_vec();
        assert!(TripSnapshotLoader::parse_bytes(&mut json).is_err());

        let mut json = b"[{broken".to_vec();
        assert!(TripSnapshotLoader::parse_bytes(&mut json).is_err());
    }

    // ========== load ==========

    #[test]
    fn test_load_single_file() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "trips.json", r#"[{"id": "a", "name": "A"}]"#);

        let trips = TripSnapshotLoader::new(path).load().unwrap();
        assert_eq!(trips.len(), 1);
    }

    #[test]
    fn test_load_single_broken_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "trips.json", "not json");

        let err = TripSnapshotLoader::new(path).load().unwrap_err();
        assert!(matches!(err, TripstatsError::Parse(_)));
    }

    #[test]
    fn test_load_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let err = TripSnapshotLoader::new(dir.path().join("nope.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, TripstatsError::Io(_)));
    }

    #[test]
    fn test_load_directory_merges_and_dedups() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "a.json",
            r#"[{"id": "1", "name": "first copy"}, {"name": "no id"}]"#,
        );
        write(
            dir.path(),
            "b.json",
            r#"{"trips": [{"id": "1", "name": "second copy"}, {"id": "2", "name": "other"}]}"#,
        );
        write(dir.path(), "broken.json", "{{{");
        write(dir.path(), "notes.txt", "ignored");

        let loader = TripSnapshotLoader::new(dir.path());
        assert_eq!(loader.collect_files().unwrap().len(), 3);

        let trips = loader.load().unwrap();
        let names: Vec<&str> = trips.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["first copy", "no id", "other"]);
    }

    #[test]
    fn test_load_directory_with_glob_characters_in_name() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("trips [2024]");
        fs::create_dir(&sub).unwrap();
        write(&sub, "a.json", r#"[{"id": "1", "name": "Lisbon"}]"#);

        let loader = TripSnapshotLoader::new(&sub);
        assert_eq!(loader.collect_files().unwrap(), vec![sub.join("a.json")]);
        assert_eq!(loader.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = TempDir::new().unwrap();
        let trips = TripSnapshotLoader::new(dir.path()).load().unwrap();
        assert!(trips.is_empty());
    }

    // ========== dedup_trips ==========

    #[test]
    fn test_dedup_uses_trip_id_fallback() {
        let trips = vec![
            Trip {
                trip_id: Some("x".into()),
                name: "one".into(),
                ..Default::default()
            },
            Trip {
                id: Some("x".into()),
                name: "two".into(),
                ..Default::default()
            },
            Trip {
                name: "three".into(),
                ..Default::default()
            },
            Trip {
                name: "four".into(),
                ..Default::default()
            },
        ];

        let deduped = dedup_trips(trips);
        let names: Vec<&str> = deduped.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["one", "three", "four"]);
    }
}
