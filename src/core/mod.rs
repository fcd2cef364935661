pub mod alert;
pub mod error;
pub mod event;
pub mod timeline;

pub use alert::{Alert, AlertKind, AlertLog, Severity};
pub use error::{ReplayError, ReplayResult};
pub use event::{FleetEvent, Location, Movement};
pub use timeline::{prepare_trip, prepare_trips, RawTrip, TripTimeline};
