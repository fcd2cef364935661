pub mod csv;
pub mod json;
pub mod source;

pub use self::csv::parse_csv;
pub use json::parse_json;
pub use source::{load_trips, DirectoryTripSource, MemoryTripSource, TripSource};

use crate::core::{FleetEvent, ReplayError, ReplayResult};
use std::path::Path;

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a trip file from its leading content
pub fn detect_format(data: &[u8]) -> InputFormat {
    if is_json(data) {
        return InputFormat::Json;
    }

    if is_csv(data) {
        return InputFormat::Csv;
    }

    InputFormat::Unknown
}

fn is_json(data: &[u8]) -> bool {
    matches!(
        data.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'[') | Some(b'{')
    )
}

fn is_csv(data: &[u8]) -> bool {
    // Look for a line with commas in the first 500 bytes
    if data.len() < 10 {
        return false;
    }

    match std::str::from_utf8(&data[..data.len().min(500)]) {
        Ok(text) => text.lines().take(5).any(|line| line.chars().filter(|&c| c == ',').count() >= 2),
        // The cut may land inside a multi-byte character
        Err(e) => e.valid_up_to() > 0 && is_csv(&data[..e.valid_up_to()]),
    }
}

/// Parse trip events, auto-detecting the format
pub fn parse_events(data: &[u8]) -> ReplayResult<Vec<FleetEvent>> {
    match detect_format(data) {
        InputFormat::Json => parse_json(data),
        InputFormat::Csv => parse_csv(data),
        InputFormat::Unknown => Err(ReplayError::UnknownFormat("not JSON or CSV".to_string())),
    }
}

/// Load trip events from a file, auto-detecting format
pub async fn load_file(path: &Path) -> ReplayResult<Vec<FleetEvent>> {
    let data = tokio::fs::read(path).await?;
    parse_events(&data)
}
