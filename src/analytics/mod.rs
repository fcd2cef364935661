use crate::core::{FleetEvent, TripTimeline};
use chrono::{DateTime, Utc};

/// Default number of buckets in an event-rate histogram
pub const EVENT_RATE_BUCKETS: usize = 12;

/// A speed reading; `speed_kmh` is `None` when the event had no movement data
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSample {
    pub timestamp: DateTime<Utc>,
    pub speed_kmh: Option<f64>,
}

/// Event count within one histogram bucket
#[derive(Debug, Clone, PartialEq)]
pub struct RateBucket {
    pub start_ms: i64,
    pub count: usize,
}

/// Earliest and latest event time across all trips
pub fn time_range(trips: &[TripTimeline]) -> Option<(i64, i64)> {
    let start = trips.iter().filter_map(|t| t.start_ms()).min()?;
    let end = trips.iter().filter_map(|t| t.end_ms()).max()?;
    Some((start, end))
}

/// Percentage of a trip's events reached by `current`, rounded
pub fn trip_progress(timeline: &TripTimeline, current: Option<&FleetEvent>) -> u8 {
    let Some(current) = current else {
        return 0;
    };
    let Some(idx) = timeline
        .events
        .iter()
        .position(|e| e.event_id == current.event_id)
    else {
        return 0;
    };

    (((idx + 1) as f64 / timeline.len() as f64) * 100.0).round() as u8
}

/// Speed readings of the events reached by `pointer`
pub fn speed_series(timeline: &TripTimeline, pointer: usize) -> Vec<SpeedSample> {
    timeline.events[..pointer.min(timeline.len())]
        .iter()
        .filter_map(|e| {
            e.timestamp.map(|timestamp| SpeedSample {
                timestamp,
                speed_kmh: e.speed_kmh(),
            })
        })
        .collect()
}

/// Histogram of events over the trip's duration
pub fn event_rate(timeline: &TripTimeline, buckets: usize) -> Vec<RateBucket> {
    let (Some(min), Some(max)) = (timeline.start_ms(), timeline.end_ms()) else {
        return Vec::new();
    };
    let buckets = buckets.max(1);
    let width = (max - min) as f64 / buckets as f64;
    let step = if width > 0.0 { width } else { 1.0 };

    let mut counts = vec![0usize; buckets];
    for ts in &timeline.timestamps {
        let idx = (((ts - min) as f64 / step).floor() as usize).min(buckets - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| RateBucket {
            start_ms: min + (i as f64 * width) as i64,
            count,
        })
        .collect()
}
