use anyhow::{bail, Context, Result};
use fleet_replay::analytics::{event_rate, speed_series, trip_progress, EVENT_RATE_BUCKETS};
use fleet_replay::core::Severity;
use fleet_replay::input::{load_trips, DirectoryTripSource};
use fleet_replay::{PlaybackCommand, PlaybackEngine, ReplayConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fleet-replay [TRIPS_DIR] [--seconds N] [--speed X]";

/// Command line overrides for the stored settings
struct CliArgs {
    trips_dir: Option<PathBuf>,
    seconds: f64,
    speed: Option<f64>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = CliArgs {
            trips_dir: None,
            seconds: 10.0,
            speed: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seconds" => {
                    let value = args.next().context(USAGE)?;
                    parsed.seconds = value.parse().with_context(|| format!("Invalid --seconds {}", value))?;
                }
                "--speed" => {
                    let value = args.next().context(USAGE)?;
                    parsed.speed = Some(value.parse().with_context(|| format!("Invalid --speed {}", value))?);
                }
                "-h" | "--help" => bail!(USAGE),
                _ if arg.starts_with("--") => bail!("Unknown option {}\n{}", arg, USAGE),
                _ => parsed.trips_dir = Some(PathBuf::from(arg)),
            }
        }

        Ok(parsed)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let mut config = ReplayConfig::load();
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    let trips_dir = args
        .trips_dir
        .clone()
        .or_else(|| config.trips_dir.clone())
        .context(USAGE)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(replay(trips_dir, args.seconds, config))
}

async fn replay(trips_dir: PathBuf, seconds: f64, config: ReplayConfig) -> Result<()> {
    let source = DirectoryTripSource::scan(&trips_dir)
        .await
        .with_context(|| format!("Failed to list trips in {}", trips_dir.display()))?;
    let trips = load_trips(&source).await;
    if trips.is_empty() {
        bail!("No trip files in {}", trips_dir.display());
    }

    let mut engine = PlaybackEngine::new(config.playback());
    let mut updates = engine.store().subscribe();
    let (commands, command_rx) = mpsc::unbounded_channel();

    let driver = tokio::spawn(async move {
        engine.run(command_rx).await;
        engine
    });

    commands.send(PlaybackCommand::Prepare(trips))?;
    while updates.borrow_and_update().trip_count == 0 {
        match tokio::time::timeout(Duration::from_secs(10), updates.changed()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => bail!("Playback stopped before trips were prepared"),
            Err(_) => bail!("Timed out preparing trips"),
        }
    }
    commands.send(PlaybackCommand::Play)?;

    let deadline = tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0)));
    tokio::pin!(deadline);
    let mut last_alert = None;

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.latest_alert != last_alert {
                    if let Some(alert) = &snapshot.latest_alert {
                        match alert.severity {
                            Severity::Warning => warn!("[{}] {}", alert.id, alert.msg),
                            Severity::Critical => error!("[{}] {}", alert.id, alert.msg),
                        }
                    }
                    last_alert = snapshot.latest_alert;
                }
                if snapshot.finished {
                    info!("Playback finished");
                    break;
                }
            }
        }
    }

    commands.send(PlaybackCommand::Shutdown)?;
    let mut engine = driver.await.context("Playback task failed")?;
    engine.settle().await;
    report(&engine);
    Ok(())
}

fn report(engine: &PlaybackEngine) {
    let store = engine.store();
    info!("Simulated time {} ms, {} alerts", store.sim_time_ms(), store.alerts().len());

    for (trip, &pointer) in store.trips().iter().zip(store.pointers()) {
        let current = store.active_event(&trip.trip_id);
        let speeds = speed_series(trip, pointer);
        let last_speed = speeds
            .iter()
            .rev()
            .find_map(|s| s.speed_kmh)
            .map(|s| format!("{} km/h", s))
            .unwrap_or_else(|| "--".to_string());
        let busiest = event_rate(trip, EVENT_RATE_BUCKETS)
            .into_iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0);

        match store.position(&trip.trip_id) {
            Some(position) => info!(
                "{}: {}% complete, {} at ({:.5}, {:.5}), speed {}, peak {} events/bucket",
                trip.trip_name,
                trip_progress(trip, current),
                current.map(|e| e.event_type.as_str()).unwrap_or("no event yet"),
                position.location.lat,
                position.location.lng,
                last_speed,
                busiest
            ),
            None => info!("{}: no position data", trip.trip_name),
        }
    }
}
