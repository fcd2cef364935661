//! Synchronized playback of per-vehicle trip event logs.
//!
//! Trips are sorted and indexed on a background [`worker`] task, while the
//! [`playback`] engine advances simulated time, diffs per-trip pointers into
//! alerts, interpolates vehicle positions and publishes the result to a
//! [`state::ReplayStore`].

pub mod analytics;
pub mod config;
pub mod core;
pub mod input;
pub mod playback;
pub mod state;
pub mod worker;

pub use crate::config::ReplayConfig;
pub use crate::core::{Alert, FleetEvent, RawTrip, ReplayError, TripTimeline};
pub use crate::playback::{PlaybackCommand, PlaybackConfig, PlaybackEngine, PlaybackState};
pub use crate::state::ReplayStore;
