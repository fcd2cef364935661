pub mod clock;
pub mod delta;
pub mod engine;
pub mod interpolate;
pub mod pointer;

pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use delta::{DeltaOutcome, DeltaProcessor, VehicleUpdate};
pub use engine::PlaybackEngine;
pub use interpolate::{interpolate, Interpolation, VehiclePosition};
pub use pointer::{resolve_pointer, resolve_pointers};

use crate::core::{alert::DEFAULT_ALERT_CAPACITY, RawTrip};
use std::time::Duration;

/// Slowest and fastest accepted speed multipliers
pub const MIN_SPEED: f64 = 0.01;
pub const MAX_SPEED: f64 = 100_000.0;

/// Clamp a speed multiplier into range; `None` unless positive and finite
pub fn validated_speed(speed: f64) -> Option<f64> {
    (speed.is_finite() && speed > 0.0).then(|| speed.clamp(MIN_SPEED, MAX_SPEED))
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub speed: f64, // 1.0 = real-time, 2.0 = 2x speed
    pub loop_playback: bool,
    pub tick_interval: Duration,
    pub alert_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            loop_playback: false,
            tick_interval: Duration::from_millis(16),
            alert_capacity: DEFAULT_ALERT_CAPACITY,
        }
    }
}

/// Control input for a running [`PlaybackEngine::run`] loop
#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    Prepare(Vec<RawTrip>),
    Play,
    Pause,
    Seek(i64),
    SetSpeed(f64),
    Shutdown,
}
