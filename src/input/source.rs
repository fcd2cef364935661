use crate::core::{FleetEvent, RawTrip, ReplayError, ReplayResult};
use crate::input::load_file;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Supplier of raw trip logs
///
/// Implementations:
/// - [`DirectoryTripSource`] reads JSON/CSV trip files from disk
/// - [`MemoryTripSource`] serves preloaded events, mainly for tests
#[async_trait]
pub trait TripSource: Send + Sync {
    /// References of the trips this source can provide, in display order
    fn trip_refs(&self) -> Vec<String>;

    /// Fetch the unordered events of one trip
    async fn fetch(&self, trip_ref: &str) -> ReplayResult<Vec<FleetEvent>>;
}

/// Fetch every trip of a source.
///
/// A trip that fails to load is kept with no events so the remaining trips
/// still play.
pub async fn load_trips(source: &dyn TripSource) -> Vec<RawTrip> {
    let mut trips = Vec::new();

    for trip_ref in source.trip_refs() {
        let name = display_name(&trip_ref);
        match source.fetch(&trip_ref).await {
            Ok(events) => {
                let trip_id = events
                    .first()
                    .map(|e| e.trip_id.clone())
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| trip_ref.clone());
                info!("Loaded {} events for {}", events.len(), trip_id);
                trips.push(RawTrip {
                    trip_id,
                    trip_name: name,
                    events,
                });
            }
            Err(e) => {
                let err = ReplayError::DataUnavailable {
                    trip_id: trip_ref.clone(),
                    reason: e.to_string(),
                };
                warn!("{}", err);
                trips.push(RawTrip {
                    trip_id: trip_ref,
                    trip_name: name,
                    events: Vec::new(),
                });
            }
        }
    }

    trips
}

/// "trip_1_cross_country.json" -> "trip 1 cross country"
fn display_name(trip_ref: &str) -> String {
    let stem = Path::new(trip_ref)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| trip_ref.to_string());
    stem.replace('_', " ")
}

/// Trip files in a directory, one trip per file
pub struct DirectoryTripSource {
    dir: PathBuf,
    files: Vec<String>,
}

impl DirectoryTripSource {
    /// Use an explicit list of file names within `dir`
    pub fn new(dir: impl Into<PathBuf>, files: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    /// Every `.json` and `.csv` file in `dir`, sorted by name
    pub async fn scan(dir: impl Into<PathBuf>) -> ReplayResult<Self> {
        let dir = dir.into();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_trip_file = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json") || e.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_trip_file {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    files.push(name.to_string());
                }
            }
        }

        files.sort();
        Ok(Self { dir, files })
    }
}

#[async_trait]
impl TripSource for DirectoryTripSource {
    fn trip_refs(&self) -> Vec<String> {
        self.files.clone()
    }

    async fn fetch(&self, trip_ref: &str) -> ReplayResult<Vec<FleetEvent>> {
        load_file(&self.dir.join(trip_ref)).await
    }
}

/// In-memory trip source
#[derive(Default)]
pub struct MemoryTripSource {
    order: Vec<String>,
    trips: HashMap<String, Vec<FleetEvent>>,
}

impl MemoryTripSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, trip_ref: &str, events: Vec<FleetEvent>) {
        if !self.trips.contains_key(trip_ref) {
            self.order.push(trip_ref.to_string());
        }
        self.trips.insert(trip_ref.to_string(), events);
    }

    /// Register a trip whose fetch will fail
    pub fn insert_missing(&mut self, trip_ref: &str) {
        self.trips.remove(trip_ref);
        if !self.order.iter().any(|r| r == trip_ref) {
            self.order.push(trip_ref.to_string());
        }
    }
}

#[async_trait]
impl TripSource for MemoryTripSource {
    fn trip_refs(&self) -> Vec<String> {
        self.order.clone()
    }

    async fn fetch(&self, trip_ref: &str) -> ReplayResult<Vec<FleetEvent>> {
        self.trips
            .get(trip_ref)
            .cloned()
            .ok_or_else(|| {
                ReplayError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no data for {}", trip_ref),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(trip_id: &str) -> FleetEvent {
        let mut ev = FleetEvent::new("e1", "trip_started", Utc.timestamp_millis_opt(0).unwrap());
        ev.trip_id = trip_id.to_string();
        ev
    }

    #[tokio::test]
    async fn test_failed_trip_degrades_to_empty() {
        let mut source = MemoryTripSource::new();
        source.insert("trip_1_cross_country.json", vec![event("trip_1")]);
        source.insert_missing("trip_2_urban_dense.json");

        let trips = load_trips(&source).await;

        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].trip_id, "trip_1");
        assert_eq!(trips[0].trip_name, "trip 1 cross country");
        assert_eq!(trips[0].events.len(), 1);
        assert_eq!(trips[1].trip_id, "trip_2_urban_dense.json");
        assert!(trips[1].events.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_empty() {
        let source = DirectoryTripSource::new(
            "/nonexistent/fleet-replay-trips",
            vec!["trip_9.json".to_string()],
        );

        let trips = load_trips(&source).await;
        assert_eq!(trips.len(), 1);
        assert!(trips[0].events.is_empty());
    }

    #[tokio::test]
    async fn test_scan_missing_dir_is_an_error() {
        assert!(DirectoryTripSource::scan("/nonexistent/fleet-replay-trips").await.is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("trip_3_mountain_cancelled.json"), "trip 3 mountain cancelled");
    }
}
