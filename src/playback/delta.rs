use crate::core::{Alert, AlertKind, FleetEvent, TripTimeline};
use std::collections::HashSet;
use tracing::debug;

/// New current event for one trip; `None` when no event has been reached
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleUpdate {
    pub trip_id: String,
    pub event: Option<FleetEvent>,
}

/// What changed between two pointer sets
#[derive(Debug, Clone, Default)]
pub struct DeltaOutcome {
    /// Alerts in the order their events were crossed
    pub alerts: Vec<Alert>,
    pub updates: Vec<VehicleUpdate>,
}

/// Identity of an event within its trip; events without an id fall back to
/// their position in the prepared timeline
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EventKey {
    Id(String),
    Index(usize),
}

/// Diffs consecutive pointer sets into alerts and current-event updates.
///
/// Only forward movement scans the crossed range for alerts. Backward seeks
/// just move the current event. Each `(trip, event, kind)` alerts once for the
/// lifetime of the processor, so replaying a stretch never repeats alerts.
#[derive(Debug, Default)]
pub struct DeltaProcessor {
    alerted: HashSet<(String, EventKey, AlertKind)>,
}

impl DeltaProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, trips: &[TripTimeline], old: &[usize], new: &[usize]) -> DeltaOutcome {
        let mut outcome = DeltaOutcome::default();

        for (idx, trip) in trips.iter().enumerate() {
            let old_ptr = old.get(idx).copied().unwrap_or(0).min(trip.len());
            let new_ptr = new.get(idx).copied().unwrap_or(0).min(trip.len());

            if new_ptr == old_ptr {
                continue;
            }

            if new_ptr > old_ptr {
                for (offset, event) in trip.events[old_ptr..new_ptr].iter().enumerate() {
                    self.collect_alerts(&trip.trip_id, old_ptr + offset, event, &mut outcome.alerts);
                }
            } else {
                debug!("Trip {} moved back {} -> {}", trip.trip_id, old_ptr, new_ptr);
            }

            outcome.updates.push(VehicleUpdate {
                trip_id: trip.trip_id.clone(),
                event: trip.current_event(new_ptr).cloned(),
            });
        }

        outcome
    }

    fn collect_alerts(&mut self, trip_id: &str, index: usize, event: &FleetEvent, alerts: &mut Vec<Alert>) {
        let key = if event.event_id.is_empty() {
            EventKey::Index(index)
        } else {
            EventKey::Id(event.event_id.clone())
        };

        for alert in Alert::from_event(event) {
            if self.alerted.insert((trip_id.to_string(), key.clone(), alert.kind)) {
                alerts.push(alert);
            }
        }
    }
}
