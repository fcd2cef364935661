use crate::core::{Alert, AlertLog, FleetEvent, TripTimeline};
use crate::playback::delta::VehicleUpdate;
use crate::playback::interpolate::VehiclePosition;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Summary broadcast to subscribers after each applied batch of writes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub revision: u64,
    pub sim_time_ms: i64,
    pub running: bool,
    /// Playback stopped because it reached the end of the data
    pub finished: bool,
    pub speed_multiplier: f64,
    pub trip_count: usize,
    pub alert_count: usize,
    pub latest_alert: Option<Alert>,
}

/// Published playback state.
///
/// Owned and written by the playback engine only. Presentation code reads it
/// through a shared reference or follows it with [`ReplayStore::subscribe`].
pub struct ReplayStore {
    trips: Arc<[TripTimeline]>,
    pointers: Vec<usize>,
    sim_time_ms: i64,
    running: bool,
    finished: bool,
    speed_multiplier: f64,
    active_events: HashMap<String, Option<FleetEvent>>,
    positions: HashMap<String, VehiclePosition>,
    alerts: AlertLog,
    revision: u64,
    publisher: watch::Sender<StoreSnapshot>,
}

impl Default for ReplayStore {
    fn default() -> Self {
        Self::new(AlertLog::default().capacity())
    }
}

impl ReplayStore {
    pub fn new(alert_capacity: usize) -> Self {
        let (publisher, _) = watch::channel(StoreSnapshot {
            speed_multiplier: 1.0,
            ..Default::default()
        });

        Self {
            trips: Arc::from(Vec::new()),
            pointers: Vec::new(),
            sim_time_ms: 0,
            running: false,
            finished: false,
            speed_multiplier: 1.0,
            active_events: HashMap::new(),
            positions: HashMap::new(),
            alerts: AlertLog::with_capacity(alert_capacity),
            revision: 0,
            publisher,
        }
    }

    // ---- writers ----

    pub fn set_trips(&mut self, trips: Arc<[TripTimeline]>) {
        self.active_events.clear();
        self.positions.clear();
        self.trips = trips;
    }

    pub fn set_pointers(&mut self, pointers: Vec<usize>) {
        self.pointers = pointers;
    }

    pub fn set_sim_time_ms(&mut self, sim_time_ms: i64) {
        self.sim_time_ms = sim_time_ms;
    }

    pub fn bulk_update_vehicles(&mut self, updates: Vec<VehicleUpdate>) {
        for update in updates {
            self.active_events.insert(update.trip_id, update.event);
        }
    }

    pub fn set_positions(&mut self, positions: Vec<VehiclePosition>) {
        self.positions = positions
            .into_iter()
            .map(|p| (p.trip_id.clone(), p))
            .collect();
    }

    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    pub fn set_speed(&mut self, speed_multiplier: f64) {
        self.speed_multiplier = speed_multiplier;
    }

    /// Drop all playback data, keeping subscribers and alert capacity
    pub fn reset(&mut self) {
        self.trips = Arc::from(Vec::new());
        self.pointers.clear();
        self.sim_time_ms = 0;
        self.running = false;
        self.finished = false;
        self.speed_multiplier = 1.0;
        self.active_events.clear();
        self.positions.clear();
        self.alerts.clear();
    }

    /// Notify subscribers that a batch of writes is complete
    pub fn publish(&mut self) {
        self.revision += 1;
        self.publisher.send_replace(self.snapshot());
    }

    // ---- readers ----

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            revision: self.revision,
            sim_time_ms: self.sim_time_ms,
            running: self.running,
            finished: self.finished,
            speed_multiplier: self.speed_multiplier,
            trip_count: self.trips.len(),
            alert_count: self.alerts.len(),
            latest_alert: self.alerts.latest().cloned(),
        }
    }

    pub fn trips(&self) -> &Arc<[TripTimeline]> {
        &self.trips
    }

    pub fn pointers(&self) -> &[usize] {
        &self.pointers
    }

    pub fn sim_time_ms(&self) -> i64 {
        self.sim_time_ms
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Current event of a trip; `None` when the trip has no event yet
    pub fn active_event(&self, trip_id: &str) -> Option<&FleetEvent> {
        self.active_events.get(trip_id).and_then(|e| e.as_ref())
    }

    pub fn position(&self, trip_id: &str) -> Option<&VehiclePosition> {
        self.positions.get(trip_id)
    }

    pub fn positions(&self) -> impl Iterator<Item = &VehiclePosition> {
        self.positions.values()
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }
}
