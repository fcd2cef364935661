use crate::core::{RawTrip, TripTimeline};
use std::sync::Arc;

/// Monotonic id attached to every request and echoed by its response
pub type RequestSeq = u64;

/// Commands sent to the event processor
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    /// Sort and index a fresh dataset
    Prepare { seq: RequestSeq, trips: Vec<RawTrip> },

    /// Resolve per-trip pointers at a simulated time
    FindPointers {
        seq: RequestSeq,
        sim_time_ms: i64,
        trips: Arc<[TripTimeline]>,
    },
}

/// Results delivered back to the playback side
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Prepared {
        seq: RequestSeq,
        trips: Arc<[TripTimeline]>,
    },

    /// `sim_time_ms` echoes the requested time
    Pointers {
        seq: RequestSeq,
        pointers: Vec<usize>,
        sim_time_ms: i64,
    },
}

impl WorkerRequest {
    pub fn seq(&self) -> RequestSeq {
        match self {
            WorkerRequest::Prepare { seq, .. } | WorkerRequest::FindPointers { seq, .. } => *seq,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkerRequest::Prepare { .. } => "prepare",
            WorkerRequest::FindPointers { .. } => "findPointers",
        }
    }
}

impl WorkerResponse {
    pub fn seq(&self) -> RequestSeq {
        match self {
            WorkerResponse::Prepared { seq, .. } | WorkerResponse::Pointers { seq, .. } => *seq,
        }
    }
}
