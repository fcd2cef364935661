use crate::analytics::time_range;
use crate::core::{prepare_trips, RawTrip, TripTimeline};
use crate::playback::clock::{SystemTimeSource, TimeSource};
use crate::playback::delta::DeltaProcessor;
use crate::playback::interpolate::{interpolate, VehiclePosition};
use crate::playback::{validated_speed, PlaybackCommand, PlaybackConfig, PlaybackState};
use crate::state::ReplayStore;
use crate::worker::{EventProcessor, RequestSeq, WorkerRequest, WorkerResponse};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Playback engine for trip event logs
///
/// Owns the simulated clock and the published [`ReplayStore`]. Sorting and
/// pointer lookups happen on the [`EventProcessor`] task; the engine only
/// sends requests and applies the responses as they come back.
pub struct PlaybackEngine<T: TimeSource = SystemTimeSource> {
    config: PlaybackConfig,
    state: PlaybackState,
    time: T,
    requests: Option<mpsc::UnboundedSender<WorkerRequest>>,
    responses: Option<mpsc::UnboundedReceiver<WorkerResponse>>,
    /// Dataset the current pointers refer to
    timelines: Option<Arc<[TripTimeline]>>,
    /// Latest prepare request not yet answered
    pending_dataset: Option<RequestSeq>,
    last_pointers: Vec<usize>,
    delta: DeltaProcessor,
    store: ReplayStore,
    /// Requested simulated time; the store holds the last confirmed one
    cursor_ms: f64,
    last_tick_ms: Option<f64>,
    seq: RequestSeq,
    last_applied_seq: RequestSeq,
    in_flight: usize,
}

impl PlaybackEngine<SystemTimeSource> {
    pub fn new(config: PlaybackConfig) -> Self {
        Self::with_time_source(config, SystemTimeSource::default())
    }
}

impl<T: TimeSource> PlaybackEngine<T> {
    pub fn with_time_source(mut config: PlaybackConfig, time: T) -> Self {
        config.speed = validated_speed(config.speed).unwrap_or_else(|| {
            warn!("Invalid speed multiplier {}, using 1.0", config.speed);
            1.0
        });

        let (requests, responses) = match EventProcessor::spawn() {
            Ok(handle) => {
                let (requests, responses) = handle.into_parts();
                (Some(requests), Some(responses))
            }
            Err(e) => {
                warn!("{}; seeking will only move the clock", e);
                (None, None)
            }
        };

        let mut store = ReplayStore::new(config.alert_capacity);
        store.set_speed(config.speed);

        Self {
            config,
            state: PlaybackState::Stopped,
            time,
            requests,
            responses,
            timelines: None,
            pending_dataset: None,
            last_pointers: Vec::new(),
            delta: DeltaProcessor::new(),
            store,
            cursor_ms: 0.0,
            last_tick_ms: None,
            seq: 0,
            last_applied_seq: 0,
            in_flight: 0,
        }
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Whether a prepared dataset is loaded and no reload is pending
    pub fn is_prepared(&self) -> bool {
        self.timelines.is_some() && self.pending_dataset.is_none()
    }

    /// Whether the background event processor is reachable
    pub fn has_worker(&self) -> bool {
        self.requests.is_some()
    }

    pub fn store(&self) -> &ReplayStore {
        &self.store
    }

    /// Get current playback speed
    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    /// Requests sent whose responses have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// First and last event time across the prepared trips
    pub fn time_range(&self) -> Option<(i64, i64)> {
        self.timelines.as_deref().and_then(time_range)
    }

    /// Hand a new dataset to the event processor.
    ///
    /// Playback stops until the prepared timelines come back.
    pub fn prepare(&mut self, trips: Vec<RawTrip>) {
        self.pause();
        self.store.set_finished(false);
        if !self.has_worker() {
            // Readers still get the dataset, but playback stays unavailable
            self.store.set_trips(prepare_trips(trips));
            self.store.publish();
            return;
        }

        let seq = self.next_seq();
        info!("Preparing {} trips", trips.len());
        if self.dispatch(WorkerRequest::Prepare { seq, trips }) {
            self.pending_dataset = Some(seq);
        }
    }

    /// Start/resume playback
    pub fn play(&mut self) {
        if !self.is_prepared() {
            debug!("Play ignored, trips are not prepared");
            return;
        }
        if self.state == PlaybackState::Running {
            return;
        }

        self.state = PlaybackState::Running;
        self.last_tick_ms = Some(self.time.now_ms());
        self.store.set_running(true);
        self.store.set_finished(false);
        self.store.publish();
    }

    /// Pause playback; requests already sent still apply
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        self.state = PlaybackState::Stopped;
        self.last_tick_ms = None;
        self.store.set_running(false);
        self.store.publish();
    }

    /// Jump to a simulated time
    pub fn seek(&mut self, target_ms: i64) {
        if !self.has_worker() {
            // Without the processor there is nothing to resolve against
            self.cursor_ms = target_ms as f64;
            self.store.set_sim_time_ms(target_ms);
            self.store.publish();
            return;
        }
        if !self.is_prepared() {
            debug!("Seek ignored, trips are not prepared");
            return;
        }

        self.cursor_ms = target_ms as f64;
        self.request_pointers(target_ms);
    }

    /// Set playback speed
    pub fn set_speed(&mut self, speed: f64) {
        let Some(speed) = validated_speed(speed) else {
            warn!("Ignoring invalid speed multiplier {}", speed);
            return;
        };

        self.config.speed = speed;
        self.store.set_speed(self.config.speed);
        self.store.publish();
    }

    /// Advance simulated time by the real time elapsed since the last tick
    pub fn tick(&mut self) {
        if self.state != PlaybackState::Running {
            return;
        }

        let now = self.time.now_ms();
        let last = self.last_tick_ms.replace(now).unwrap_or(now);
        let dt = (now - last).max(0.0);
        self.cursor_ms += dt * self.config.speed;

        if let Some((start, end)) = self.time_range() {
            if self.cursor_ms > end as f64 {
                // Cross the tail of the data before wrapping or stopping
                self.request_pointers(end);
                if self.config.loop_playback {
                    debug!("Reached end of data, looping");
                    self.cursor_ms = start as f64;
                } else {
                    info!("Reached end of data");
                    self.cursor_ms = end as f64;
                    self.store.set_finished(true);
                    self.pause();
                    return;
                }
            }
        }

        self.request_pointers(self.cursor_ms.round() as i64);
    }

    /// Apply one response from the event processor
    pub fn apply_response(&mut self, response: WorkerResponse) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let seq = response.seq();
        if seq <= self.last_applied_seq {
            debug!("Discarding stale response {} (applied {})", seq, self.last_applied_seq);
            return;
        }

        match response {
            WorkerResponse::Prepared { seq, trips } => self.apply_prepared(seq, trips),
            WorkerResponse::Pointers {
                seq,
                pointers,
                sim_time_ms,
            } => self.apply_pointers(seq, pointers, sim_time_ms),
        }
    }

    /// Apply every response that has already arrived
    pub fn drain_responses(&mut self) -> usize {
        let mut applied = 0;
        while let Some(response) = self.responses.as_mut().and_then(|rx| rx.try_recv().ok()) {
            self.apply_response(response);
            applied += 1;
        }
        applied
    }

    /// Wait until every outstanding request has been answered
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            let response = match self.responses.as_mut() {
                Some(rx) => rx.recv().await,
                None => None,
            };
            match response {
                Some(response) => self.apply_response(response),
                None => {
                    warn!("Event processor closed with {} requests outstanding", self.in_flight);
                    self.in_flight = 0;
                }
            }
        }
    }

    /// Drive playback from a command channel until `Shutdown` or the channel closes
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<PlaybackCommand>) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut responses = self.responses.take();

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(),
                response = next_response(&mut responses) => self.apply_response(response),
                command = commands.recv() => match command {
                    Some(PlaybackCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
            }
        }

        self.responses = responses;
    }

    pub fn handle_command(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Prepare(trips) => self.prepare(trips),
            PlaybackCommand::Play => self.play(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Seek(target_ms) => self.seek(target_ms),
            PlaybackCommand::SetSpeed(speed) => self.set_speed(speed),
            PlaybackCommand::Shutdown => {}
        }
    }

    /// Drop the loaded dataset and discard every outstanding response
    pub fn reset(&mut self) {
        self.pause();
        self.timelines = None;
        self.pending_dataset = None;
        self.last_pointers.clear();
        self.cursor_ms = 0.0;
        self.last_applied_seq = self.seq;
        self.store.reset();
        self.store.set_speed(self.config.speed);
        self.store.publish();
    }

    fn next_seq(&mut self) -> RequestSeq {
        self.seq += 1;
        self.seq
    }

    fn dispatch(&mut self, request: WorkerRequest) -> bool {
        let Some(requests) = &self.requests else {
            return false;
        };

        let name = request.name();
        if requests.send(request).is_err() {
            warn!("Event processor closed, dropping {} request", name);
            self.requests = None;
            return false;
        }
        self.in_flight += 1;
        true
    }

    fn request_pointers(&mut self, sim_time_ms: i64) {
        let Some(trips) = self.timelines.clone() else {
            return;
        };
        if self.pending_dataset.is_some() {
            return;
        }

        let seq = self.next_seq();
        let sent = self.dispatch(WorkerRequest::FindPointers {
            seq,
            sim_time_ms,
            trips,
        });
        if !sent {
            self.store.set_sim_time_ms(sim_time_ms);
            self.store.publish();
        }
    }

    fn apply_prepared(&mut self, seq: RequestSeq, trips: Arc<[TripTimeline]>) {
        self.last_applied_seq = seq;
        if self.pending_dataset == Some(seq) {
            self.pending_dataset = None;
        }

        self.last_pointers = vec![0; trips.len()];
        self.store.set_trips(trips.clone());
        self.store.set_pointers(self.last_pointers.clone());
        self.timelines = Some(trips);

        if let Some((start, end)) = self.time_range() {
            info!("Dataset ready, {} .. {} ms", start, end);
            self.cursor_ms = start as f64;
            self.store.set_sim_time_ms(start);
        }

        self.refresh_positions();
        self.store.publish();
    }

    fn apply_pointers(&mut self, seq: RequestSeq, pointers: Vec<usize>, sim_time_ms: i64) {
        let Some(trips) = self.timelines.clone() else {
            return;
        };
        if pointers.len() != trips.len() {
            warn!(
                "Pointer response {} has {} entries for {} trips",
                seq,
                pointers.len(),
                trips.len()
            );
            return;
        }
        self.last_applied_seq = seq;

        let outcome = self.delta.process(&trips, &self.last_pointers, &pointers);
        for alert in outcome.alerts {
            debug!("Alert {:?} for event {}: {}", alert.kind, alert.id, alert.msg);
            self.store.push_alert(alert);
        }
        if !outcome.updates.is_empty() {
            self.store.bulk_update_vehicles(outcome.updates);
        }

        self.last_pointers = pointers.clone();
        self.store.set_pointers(pointers);
        self.store.set_sim_time_ms(sim_time_ms);
        self.refresh_positions();
        self.store.publish();
    }

    fn refresh_positions(&mut self) {
        let Some(trips) = self.timelines.clone() else {
            return;
        };
        let sim_time_ms = self.store.sim_time_ms();

        let positions = trips
            .iter()
            .zip(&self.last_pointers)
            .filter_map(|(trip, &pointer)| {
                interpolate(trip, pointer, sim_time_ms)
                    .map(|interp| VehiclePosition::from_interpolation(&trip.trip_id, &interp))
            })
            .collect();
        self.store.set_positions(positions);
    }
}

async fn next_response(responses: &mut Option<mpsc::UnboundedReceiver<WorkerResponse>>) -> WorkerResponse {
    if let Some(rx) = responses {
        if let Some(response) = rx.recv().await {
            return response;
        }
        warn!("Event processor closed");
    }
    *responses = None;
    std::future::pending().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FleetEvent, Location, Severity};
    use crate::playback::clock::ManualTimeSource;
    use crate::playback::MAX_SPEED;
    use chrono::{TimeZone, Utc};

    fn event(id: &str, event_type: &str, ts_ms: i64, lat: f64) -> FleetEvent {
        let mut ev = FleetEvent::new(id, event_type, Utc.timestamp_millis_opt(ts_ms).unwrap());
        ev.trip_id = "trip_1".to_string();
        ev.location = Some(Location::new(lat, lat));
        ev
    }

    /// Events at 100, 200, 300, 400 with a speed violation at 300 and the
    /// trip cancelled at 400
    fn sample_trips() -> Vec<RawTrip> {
        vec![
            RawTrip::new(
                "trip_1",
                vec![
                    event("e3", "trip_cancelled", 400, 30.0),
                    event("e0", "location_ping", 100, 0.0),
                    event("e2", "speed_violation", 300, 20.0),
                    event("e1", "location_ping", 200, 10.0),
                ],
            ),
            RawTrip::unavailable("trip_missing"),
        ]
    }

    async fn prepared_engine(config: PlaybackConfig) -> (PlaybackEngine<ManualTimeSource>, ManualTimeSource) {
        let clock = ManualTimeSource::new();
        let mut engine = PlaybackEngine::with_time_source(config, clock.clone());
        engine.prepare(sample_trips());
        engine.settle().await;
        (engine, clock)
    }

    #[tokio::test]
    async fn test_play_before_prepare_is_ignored() {
        let mut engine = PlaybackEngine::with_time_source(PlaybackConfig::default(), ManualTimeSource::new());
        assert!(engine.has_worker());
        assert!(!engine.is_prepared());

        engine.play();
        assert_eq!(engine.state(), PlaybackState::Stopped);

        engine.seek(1_000);
        assert_eq!(engine.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_prepare_initializes_state() {
        let (engine, _) = prepared_engine(PlaybackConfig::default()).await;

        assert!(engine.is_prepared());
        assert_eq!(engine.time_range(), Some((100, 400)));
        assert_eq!(engine.store().sim_time_ms(), 100);
        assert_eq!(engine.store().pointers(), &[0, 0]);
        assert_eq!(engine.store().trips().len(), 2);
        assert!(engine.store().active_event("trip_1").is_none());
        assert_eq!(
            engine.store().position("trip_1").map(|p| p.location),
            Some(Location::new(0.0, 0.0))
        );
        assert!(engine.store().position("trip_missing").is_none());
    }

    #[tokio::test]
    async fn test_seek_resolves_and_interpolates() {
        let (mut engine, _) = prepared_engine(PlaybackConfig::default()).await;

        engine.seek(250);
        engine.settle().await;

        let store = engine.store();
        assert_eq!(store.sim_time_ms(), 250);
        assert_eq!(store.pointers(), &[2, 0]);
        assert_eq!(store.active_event("trip_1").map(|e| e.event_id.as_str()), Some("e1"));

        let position = store.position("trip_1").unwrap();
        assert_eq!(position.ratio, 0.5);
        assert_eq!(position.location, Location::new(15.0, 15.0));
    }

    #[tokio::test]
    async fn test_repeated_seek_is_idempotent() {
        let (mut engine, _) = prepared_engine(PlaybackConfig::default()).await;

        engine.seek(320);
        engine.settle().await;
        let pointers = engine.store().pointers().to_vec();
        let position = engine.store().position("trip_1").cloned();

        engine.seek(320);
        engine.settle().await;
        assert_eq!(engine.store().pointers(), pointers.as_slice());
        assert_eq!(engine.store().position("trip_1").cloned(), position);
    }

    #[tokio::test]
    async fn test_alerts_only_on_first_forward_crossing() {
        let (mut engine, _) = prepared_engine(PlaybackConfig::default()).await;

        engine.seek(350);
        engine.settle().await;
        assert_eq!(engine.store().alerts().len(), 1);
        let alert = engine.store().alerts().latest().unwrap();
        assert_eq!(alert.id, "e2");
        assert_eq!(alert.severity, Severity::Warning);

        engine.seek(150);
        engine.settle().await;
        assert_eq!(engine.store().alerts().len(), 1);
        assert_eq!(engine.store().active_event("trip_1").map(|e| e.event_id.as_str()), Some("e0"));

        engine.seek(350);
        engine.settle().await;
        assert_eq!(engine.store().alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_tick_advances_by_scaled_elapsed_time() {
        let (mut engine, clock) = prepared_engine(PlaybackConfig::default()).await;
        engine.set_speed(2.0);

        engine.play();
        assert!(engine.store().running());
        clock.advance_ms(50.0);
        engine.tick();
        engine.settle().await;

        assert_eq!(engine.store().sim_time_ms(), 200);
        assert_eq!(engine.store().pointers(), &[2, 0]);
    }

    #[tokio::test]
    async fn test_tick_ignores_clock_going_backwards() {
        let (mut engine, clock) = prepared_engine(PlaybackConfig::default()).await;
        clock.set_ms(1_000.0);
        engine.play();

        clock.set_ms(500.0);
        engine.tick();
        engine.settle().await;

        assert_eq!(engine.store().sim_time_ms(), 100);
    }

    #[tokio::test]
    async fn test_pause_stops_ticking() {
        let (mut engine, clock) = prepared_engine(PlaybackConfig::default()).await;
        engine.play();
        engine.pause();

        clock.advance_ms(100.0);
        engine.tick();
        assert_eq!(engine.in_flight(), 0);
        assert!(!engine.store().running());
    }

    #[tokio::test]
    async fn test_end_of_data_pauses() {
        let (mut engine, clock) = prepared_engine(PlaybackConfig::default()).await;
        engine.play();

        clock.advance_ms(10_000.0);
        engine.tick();
        assert_eq!(engine.state(), PlaybackState::Stopped);

        assert!(engine.store().finished());
        assert!(engine.store().snapshot().finished);

        engine.settle().await;
        assert_eq!(engine.store().sim_time_ms(), 400);
        assert_eq!(engine.store().pointers(), &[4, 0]);
        assert_eq!(engine.store().active_event("trip_1").map(|e| e.event_id.as_str()), Some("e3"));

        let alerts = engine.store().alerts();
        assert_eq!(alerts.len(), 2);
        let last = alerts.latest().unwrap();
        assert_eq!(last.id, "e3");
        assert_eq!(last.severity, Severity::Critical);

        // Playing again at the end stops straight away without repeating alerts
        engine.play();
        assert!(!engine.store().finished());
        clock.advance_ms(100.0);
        engine.tick();
        engine.settle().await;
        assert!(engine.store().finished());
        assert_eq!(engine.store().alerts().len(), 2);
    }

    #[tokio::test]
    async fn test_loop_playback_wraps_to_start() {
        let config = PlaybackConfig {
            loop_playback: true,
            ..Default::default()
        };
        let (mut engine, clock) = prepared_engine(config).await;
        engine.play();

        clock.advance_ms(10_000.0);
        engine.tick();
        engine.settle().await;

        assert!(engine.is_playing());
        assert!(!engine.store().finished());
        assert_eq!(engine.store().sim_time_ms(), 100);
        assert_eq!(engine.store().active_event("trip_1").map(|e| e.event_id.as_str()), Some("e0"));

        let alerts = engine.store().alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts.latest().map(|a| a.id.as_str()), Some("e3"));

        // A second pass over the data raises nothing new
        clock.advance_ms(10_000.0);
        engine.tick();
        engine.settle().await;
        assert_eq!(engine.store().sim_time_ms(), 100);
        assert_eq!(engine.store().alerts().len(), 2);
    }

    #[tokio::test]
    async fn test_loop_playback_crosses_last_event_in_small_ticks() {
        let config = PlaybackConfig {
            loop_playback: true,
            ..Default::default()
        };
        let (mut engine, clock) = prepared_engine(config).await;
        engine.play();

        for _ in 0..40 {
            clock.advance_ms(16.0);
            engine.tick();
            engine.settle().await;
        }

        let cancelled: Vec<_> = engine.store().alerts().iter().filter(|a| a.id == "e3").collect();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].severity, Severity::Critical);
    }

    #[tokio::test]
    async fn test_configured_speed_is_validated() {
        let config = PlaybackConfig {
            speed: -2.0,
            ..Default::default()
        };
        let (mut engine, clock) = prepared_engine(config).await;
        assert_eq!(engine.speed(), 1.0);
        assert_eq!(engine.store().speed_multiplier(), 1.0);

        engine.play();
        clock.advance_ms(100.0);
        engine.tick();
        engine.settle().await;
        assert_eq!(engine.store().sim_time_ms(), 200);

        let nan = PlaybackEngine::with_time_source(
            PlaybackConfig {
                speed: f64::NAN,
                ..Default::default()
            },
            ManualTimeSource::new(),
        );
        assert_eq!(nan.speed(), 1.0);

        let fast = PlaybackEngine::with_time_source(
            PlaybackConfig {
                speed: 1e9,
                ..Default::default()
            },
            ManualTimeSource::new(),
        );
        assert_eq!(fast.speed(), MAX_SPEED);
    }

    #[tokio::test]
    async fn test_stale_responses_are_discarded() {
        let (mut engine, _) = prepared_engine(PlaybackConfig::default()).await;

        engine.apply_response(WorkerResponse::Pointers {
            seq: 10,
            pointers: vec![3, 0],
            sim_time_ms: 300,
        });
        engine.apply_response(WorkerResponse::Pointers {
            seq: 9,
            pointers: vec![1, 0],
            sim_time_ms: 100,
        });

        assert_eq!(engine.store().sim_time_ms(), 300);
        assert_eq!(engine.store().pointers(), &[3, 0]);
    }

    #[tokio::test]
    async fn test_speed_must_be_positive() {
        let (mut engine, _) = prepared_engine(PlaybackConfig::default()).await;

        engine.set_speed(5.0);
        engine.set_speed(0.0);
        engine.set_speed(-2.0);
        engine.set_speed(f64::NAN);
        assert_eq!(engine.speed(), 5.0);
        assert_eq!(engine.store().speed_multiplier(), 5.0);
    }

    #[tokio::test]
    async fn test_reset_discards_dataset() {
        let (mut engine, _) = prepared_engine(PlaybackConfig::default()).await;
        engine.seek(350);
        engine.reset();
        engine.settle().await;

        assert!(!engine.is_prepared());
        assert!(engine.store().trips().is_empty());
        assert!(engine.store().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_run_loop_processes_commands() {
        let mut engine = PlaybackEngine::with_time_source(PlaybackConfig::default(), ManualTimeSource::new());

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(PlaybackCommand::Prepare(sample_trips())).unwrap();
        tx.send(PlaybackCommand::Shutdown).unwrap();
        engine.run(rx).await;
        engine.settle().await;
        assert!(engine.is_prepared());

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(PlaybackCommand::SetSpeed(10.0)).unwrap();
        tx.send(PlaybackCommand::Seek(300)).unwrap();
        drop(tx);
        engine.run(rx).await;
        engine.settle().await;

        assert_eq!(engine.speed(), 10.0);
        assert_eq!(engine.store().sim_time_ms(), 300);
        assert_eq!(engine.store().pointers(), &[3, 0]);
    }

    #[test]
    fn test_without_worker_seek_only_moves_clock() {
        let mut engine = PlaybackEngine::with_time_source(PlaybackConfig::default(), ManualTimeSource::new());
        assert!(!engine.has_worker());

        engine.prepare(sample_trips());
        assert!(!engine.is_prepared());
        assert_eq!(engine.store().trips().len(), 2);
        assert_eq!(engine.store().snapshot().trip_count, 2);

        engine.play();
        assert_eq!(engine.state(), PlaybackState::Stopped);

        engine.seek(5_000);
        assert_eq!(engine.store().sim_time_ms(), 5_000);
        assert!(engine.store().pointers().is_empty());
    }
}
