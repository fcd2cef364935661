use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Geographic position of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `other`; `ratio` is expected in `[0, 1]`
    pub fn lerp(&self, other: &Location, ratio: f64) -> Location {
        Location {
            lat: self.lat + (other.lat - self.lat) * ratio,
            lng: self.lng + (other.lng - self.lng) * ratio,
        }
    }
}

/// Movement telemetry attached to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(default)]
    pub speed_kmh: Option<f64>,
}

/// A single telemetry event from a vehicle trip log
///
/// Events are opaque once ingested. Fields the engine does not understand
/// are kept in `extra` so they survive a round trip through the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetEvent {
    #[serde(default)]
    pub event_id: String,

    #[serde(default)]
    pub event_type: String,

    /// Event time; `None` when the source value was missing or unparseable
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub vehicle_id: String,

    #[serde(default)]
    pub trip_id: String,

    #[serde(default)]
    pub location: Option<Location>,

    #[serde(default)]
    pub movement: Option<Movement>,

    #[serde(default)]
    pub overspeed: Option<bool>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FleetEvent {
    pub fn new(event_id: &str, event_type: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            timestamp: Some(timestamp),
            vehicle_id: String::new(),
            trip_id: String::new(),
            location: None,
            movement: None,
            overspeed: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Timestamp as Unix milliseconds
    pub fn timestamp_ms(&self) -> Option<i64> {
        self.timestamp.map(|ts| ts.timestamp_millis())
    }

    /// Reported speed, if the event carries movement data
    pub fn speed_kmh(&self) -> Option<f64> {
        self.movement.as_ref().and_then(|m| m.speed_kmh)
    }

    pub fn is_overspeed(&self) -> bool {
        self.overspeed.unwrap_or(false)
    }
}

/// Parse an event timestamp string.
///
/// Accepts RFC 3339 and naive ISO-8601 (taken as UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Timestamps arrive as strings or epoch milliseconds; anything else is dropped
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Millis(ms)) => Utc.timestamp_millis_opt(ms).single(),
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::Other(_)) | None => None,
    })
}
