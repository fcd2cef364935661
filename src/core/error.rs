use thiserror::Error;

/// Errors raised by trip loading and the worker boundary
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A trip's source could not be read; the trip degrades to an empty timeline
    #[error("Trip {trip_id} unavailable: {reason}")]
    DataUnavailable { trip_id: String, reason: String },

    /// The background worker could not be started in this environment
    #[error("Event processor unavailable: {0}")]
    BoundaryUnavailable(String),

    #[error("Unknown trip file format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ReplayResult<T> = Result<T, ReplayError>;
