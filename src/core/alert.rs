use crate::core::FleetEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of alerts kept in the log
pub const DEFAULT_ALERT_CAPACITY: usize = 500;

/// Event types that raise alerts
pub const SPEED_VIOLATION: &str = "speed_violation";
pub const TRIP_CANCELLED: &str = "trip_cancelled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    SpeedViolation,
    TripCancelled,
}

/// An alert raised when playback crosses a notable event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Id of the event that raised the alert
    pub id: String,
    pub kind: AlertKind,
    pub ts: Option<DateTime<Utc>>,
    pub msg: String,
    pub severity: Severity,
}

impl Alert {
    /// Alerts an event raises when crossed, in a fixed order
    pub fn from_event(event: &FleetEvent) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if event.event_type == SPEED_VIOLATION || event.is_overspeed() {
            let speed = event
                .speed_kmh()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string());
            alerts.push(Alert {
                id: event.event_id.clone(),
                kind: AlertKind::SpeedViolation,
                ts: event.timestamp,
                msg: format!("Overspeed {}", speed),
                severity: Severity::Warning,
            });
        }

        if event.event_type == TRIP_CANCELLED {
            alerts.push(Alert {
                id: event.event_id.clone(),
                kind: AlertKind::TripCancelled,
                ts: event.timestamp,
                msg: format!("Trip cancelled {}", event.trip_id),
                severity: Severity::Critical,
            });
        }

        alerts
    }
}

/// Bounded alert history, most recent first
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ALERT_CAPACITY)
    }
}

impl AlertLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}
