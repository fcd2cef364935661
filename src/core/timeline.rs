use crate::core::FleetEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Unprepared trip as delivered by a trip source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrip {
    pub trip_id: String,
    pub trip_name: String,
    /// Events in arbitrary order
    pub events: Vec<FleetEvent>,
}

impl RawTrip {
    pub fn new(trip_id: &str, events: Vec<FleetEvent>) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            trip_name: trip_id.to_string(),
            events,
        }
    }

    /// Placeholder for a trip whose source failed
    pub fn unavailable(trip_id: &str) -> Self {
        Self::new(trip_id, Vec::new())
    }
}

/// A trip's events sorted by time, with a parallel timestamp index
///
/// `timestamps[i] == events[i].timestamp_ms()` for every `i`, and `timestamps`
/// is non-decreasing. Timelines are never mutated after preparation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripTimeline {
    pub trip_id: String,
    pub trip_name: String,
    pub events: Vec<FleetEvent>,
    pub timestamps: Vec<i64>,
}

impl TripTimeline {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn start_ms(&self) -> Option<i64> {
        self.timestamps.first().copied()
    }

    pub fn end_ms(&self) -> Option<i64> {
        self.timestamps.last().copied()
    }

    /// Event most recently reached at `pointer`, if any
    pub fn current_event(&self, pointer: usize) -> Option<&FleetEvent> {
        pointer.checked_sub(1).and_then(|idx| self.events.get(idx))
    }
}

/// Sort a trip's events and build its timestamp index.
///
/// The sort is stable, so events sharing a timestamp keep their input order.
/// Events without a usable timestamp are left out.
pub fn prepare_trip(raw: RawTrip) -> TripTimeline {
    let total = raw.events.len();
    let mut stamped: Vec<(i64, FleetEvent)> = raw
        .events
        .into_iter()
        .filter_map(|event| event.timestamp_ms().map(|ts| (ts, event)))
        .collect();

    if stamped.len() < total {
        debug!(
            "Trip {}: dropped {} of {} events without a timestamp",
            raw.trip_id,
            total - stamped.len(),
            total
        );
    }

    stamped.sort_by_key(|(ts, _)| *ts);
    let (timestamps, events): (Vec<i64>, Vec<FleetEvent>) = stamped.into_iter().unzip();

    // Fall back to the first event's trip id when the source had none
    let trip_id = if raw.trip_id.is_empty() {
        events_trip_id(&events).unwrap_or_default()
    } else {
        raw.trip_id
    };
    let trip_name = if raw.trip_name.is_empty() {
        trip_id.clone()
    } else {
        raw.trip_name
    };

    TripTimeline {
        trip_id,
        trip_name,
        events,
        timestamps,
    }
}

fn events_trip_id(events: &[FleetEvent]) -> Option<String> {
    events
        .first()
        .map(|e| e.trip_id.clone())
        .filter(|id| !id.is_empty())
}

/// Prepare every trip of a dataset, preserving trip order
pub fn prepare_trips(raw: Vec<RawTrip>) -> Arc<[TripTimeline]> {
    raw.into_iter().map(prepare_trip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, ts_ms: i64) -> FleetEvent {
        FleetEvent::new(id, "location_ping", Utc.timestamp_millis_opt(ts_ms).unwrap())
    }

    #[test]
    fn test_sorts_by_timestamp() {
        let raw = RawTrip::new("t1", vec![event("c", 300), event("a", 100), event("b", 200)]);
        let timeline = prepare_trip(raw);

        assert_eq!(timeline.timestamps, vec![100, 200, 300]);
        let ids: Vec<_> = timeline.events.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let raw = RawTrip::new(
            "t1",
            vec![event("x", 200), event("first", 100), event("second", 100), event("third", 100)],
        );
        let timeline = prepare_trip(raw);

        let ids: Vec<_> = timeline.events.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third", "x"]);
    }

    #[test]
    fn test_index_matches_events() {
        let raw = RawTrip::new("t1", vec![event("b", 50), event("a", 10), event("c", 50)]);
        let timeline = prepare_trip(raw);

        for (ts, ev) in timeline.timestamps.iter().zip(&timeline.events) {
            assert_eq!(Some(*ts), ev.timestamp_ms());
        }
        assert!(timeline.timestamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_events_without_timestamp_are_excluded() {
        let mut broken = event("broken", 0);
        broken.timestamp = None;
        let raw = RawTrip::new("t1", vec![event("a", 100), broken]);
        let timeline = prepare_trip(raw);

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.events[0].event_id, "a");
    }

    #[test]
    fn test_empty_trip() {
        let timeline = prepare_trip(RawTrip::unavailable("missing"));
        assert!(timeline.is_empty());
        assert_eq!(timeline.start_ms(), None);
        assert_eq!(timeline.current_event(0), None);
        assert_eq!(timeline.trip_id, "missing");
    }

    #[test]
    fn test_trip_id_falls_back_to_events() {
        let mut ev = event("a", 100);
        ev.trip_id = "trip_7".to_string();
        let raw = RawTrip {
            trip_id: String::new(),
            trip_name: String::new(),
            events: vec![ev],
        };
        let timeline = prepare_trip(raw);
        assert_eq!(timeline.trip_id, "trip_7");
        assert_eq!(timeline.trip_name, "trip_7");
    }

    #[test]
    fn test_prepare_trips_keeps_order() {
        let trips = prepare_trips(vec![RawTrip::new("b", vec![]), RawTrip::new("a", vec![])]);
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].trip_id, "b");
        assert_eq!(trips[1].trip_id, "a");
    }
}
