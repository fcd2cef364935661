use crate::core::{FleetEvent, ReplayResult};
use serde::Deserialize;

/// Trip files hold either a bare event array or an object wrapping one
#[derive(Deserialize)]
#[serde(untagged)]
enum TripDocument {
    Events(Vec<FleetEvent>),
    Trip { events: Vec<FleetEvent> },
}

/// Parse trip events from JSON
pub fn parse_json(data: &[u8]) -> ReplayResult<Vec<FleetEvent>> {
    let events = match serde_json::from_slice::<TripDocument>(data) {
        Ok(TripDocument::Events(events)) | Ok(TripDocument::Trip { events }) => events,
        // Re-parse as a plain array to surface a useful error
        Err(_) => serde_json::from_slice::<Vec<FleetEvent>>(data)?,
    };
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_array() {
        let data = br#"[
            {"event_id": "a", "event_type": "trip_started", "timestamp": "2025-03-01T08:00:00Z",
             "vehicle_id": "VH_1", "trip_id": "trip_1", "location": {"lat": 1.0, "lng": 2.0}},
            {"event_id": "b", "event_type": "location_ping", "timestamp": "2025-03-01T08:01:00Z",
             "vehicle_id": "VH_1", "trip_id": "trip_1", "location": {"lat": 1.5, "lng": 2.5},
             "movement": {"speed_kmh": 40}}
        ]"#;
        let events = parse_json(data).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].speed_kmh(), Some(40.0));
    }

    #[test]
    fn test_parse_wrapped_trip() {
        let data = br#"{"trip_id": "trip_2", "events": [{"event_id": "a", "timestamp": 5}]}"#;
        let events = parse_json(data).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ms(), Some(5));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_json(b"[{\"event_id\": ").is_err());
    }
}
