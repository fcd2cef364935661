use crate::core::{FleetEvent, Location, TripTimeline};
use serde::{Deserialize, Serialize};

/// Ratio above which the next event is shown as the vehicle's current info
const DISPLAY_SWITCH_RATIO: f64 = 0.999;

/// Where a vehicle is drawn at a given simulated time
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation<'a> {
    pub location: Location,
    /// Progress between the bracketing events, always within `[0, 1]`
    pub ratio: f64,
    /// Event whose metadata represents the vehicle right now
    pub info: &'a FleetEvent,
}

/// Published position of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehiclePosition {
    pub trip_id: String,
    pub location: Location,
    pub ratio: f64,
    pub info_event_id: String,
    pub vehicle_id: String,
}

impl VehiclePosition {
    pub fn from_interpolation(trip_id: &str, interp: &Interpolation<'_>) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            location: interp.location,
            ratio: interp.ratio,
            info_event_id: interp.info.event_id.clone(),
            vehicle_id: interp.info.vehicle_id.clone(),
        }
    }
}

/// Progress of `sim_time_ms` between two timestamps, clamped to `[0, 1]`.
///
/// A zero-length gap counts as complete.
pub fn ratio_between(prev_ts: i64, next_ts: i64, sim_time_ms: i64) -> f64 {
    if next_ts == prev_ts {
        return 1.0;
    }
    let ratio = (sim_time_ms - prev_ts) as f64 / (next_ts - prev_ts) as f64;
    ratio.clamp(0.0, 1.0)
}

/// Interpolate a vehicle's position from the events bracketing `pointer`.
///
/// Returns `None` for an empty timeline or when neither bracketing event
/// carries a location.
pub fn interpolate(timeline: &TripTimeline, pointer: usize, sim_time_ms: i64) -> Option<Interpolation<'_>> {
    let last = timeline.len().checked_sub(1)?;
    let prev_idx = pointer.saturating_sub(1).min(last);
    let next_idx = pointer.min(last);

    let prev = &timeline.events[prev_idx];
    let next = &timeline.events[next_idx];

    match (prev.location, next.location) {
        (Some(from), Some(to)) => {
            let ratio = ratio_between(
                timeline.timestamps[prev_idx],
                timeline.timestamps[next_idx],
                sim_time_ms,
            );
            let info = if ratio > DISPLAY_SWITCH_RATIO { next } else { prev };
            Some(Interpolation {
                location: from.lerp(&to, ratio),
                ratio,
                info,
            })
        }
        (Some(location), None) => Some(Interpolation {
            location,
            ratio: 0.0,
            info: prev,
        }),
        (None, Some(location)) => Some(Interpolation {
            location,
            ratio: 1.0,
            info: next,
        }),
        (None, None) => None,
    }
}
