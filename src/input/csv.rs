use crate::core::{event::parse_timestamp, FleetEvent, Location, Movement, ReplayError, ReplayResult};
use chrono::{TimeZone, Utc};

/// Column positions found in a trip CSV header
struct Columns {
    event_id: usize,
    event_type: usize,
    timestamp: usize,
    vehicle_id: Option<usize>,
    trip_id: Option<usize>,
    lat: Option<usize>,
    lng: Option<usize>,
    speed: Option<usize>,
    overspeed: Option<usize>,
}

/// Parse trip events from CSV
///
/// Required columns: event id, event type and timestamp. Vehicle, trip,
/// position, speed and overspeed columns are picked up when present.
/// Timestamps may be RFC 3339 text or epoch milliseconds.
pub fn parse_csv(data: &[u8]) -> ReplayResult<Vec<FleetEvent>> {
    let mut rdr = csv::Reader::from_reader(data);
    let columns = detect_columns(rdr.headers()?)?;

    let mut events = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim).filter(|s| !s.is_empty());

        let timestamp = field(Some(columns.timestamp)).and_then(|s| {
            s.parse::<i64>()
                .ok()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .or_else(|| parse_timestamp(s))
        });

        let location = match (
            field(columns.lat).and_then(|s| s.parse::<f64>().ok()),
            field(columns.lng).and_then(|s| s.parse::<f64>().ok()),
        ) {
            (Some(lat), Some(lng)) => Some(Location::new(lat, lng)),
            _ => None,
        };

        let movement = field(columns.speed)
            .and_then(|s| s.parse::<f64>().ok())
            .map(|speed| Movement { speed_kmh: Some(speed) });

        let overspeed = field(columns.overspeed).and_then(|s| match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        });

        events.push(FleetEvent {
            event_id: field(Some(columns.event_id)).unwrap_or_default().to_string(),
            event_type: field(Some(columns.event_type)).unwrap_or_default().to_string(),
            timestamp,
            vehicle_id: field(columns.vehicle_id).unwrap_or_default().to_string(),
            trip_id: field(columns.trip_id).unwrap_or_default().to_string(),
            location,
            movement,
            overspeed,
            extra: serde_json::Map::new(),
        });
    }

    Ok(events)
}

/// Detect column indices from CSV headers
fn detect_columns(headers: &csv::StringRecord) -> ReplayResult<Columns> {
    Ok(Columns {
        event_id: require(find_column(headers, &["event_id", "id"]), "event_id")?,
        event_type: require(find_column(headers, &["event_type", "type"]), "event_type")?,
        timestamp: require(find_column(headers, &["timestamp", "time", "ts"]), "timestamp")?,
        vehicle_id: find_column(headers, &["vehicle_id", "vehicle"]),
        trip_id: find_column(headers, &["trip_id", "trip"]),
        lat: find_column(headers, &["lat", "latitude", "location_lat"]),
        lng: find_column(headers, &["lng", "lon", "longitude", "location_lng"]),
        speed: find_column(headers, &["speed_kmh", "speed", "movement_speed_kmh"]),
        overspeed: find_column(headers, &["overspeed"]),
    })
}

fn require(idx: Option<usize>, name: &str) -> ReplayResult<usize> {
    idx.ok_or_else(|| ReplayError::UnknownFormat(format!("missing CSV column {}", name)))
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| names.iter().any(|&name| header.trim().to_lowercase() == name))
}
