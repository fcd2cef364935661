use crate::core::TripTimeline;

/// Number of events at or before `sim_time_ms`.
///
/// Equivalently the smallest index whose timestamp is strictly after
/// `sim_time_ms`, found by binary search over the timestamp index.
pub fn resolve_pointer(timestamps: &[i64], sim_time_ms: i64) -> usize {
    timestamps.partition_point(|&ts| ts <= sim_time_ms)
}

/// Resolve a pointer for every trip, in trip order
pub fn resolve_pointers(trips: &[TripTimeline], sim_time_ms: i64) -> Vec<usize> {
    trips
        .iter()
        .map(|trip| resolve_pointer(&trip.timestamps, sim_time_ms))
        .collect()
}
