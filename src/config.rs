use crate::core::alert::DEFAULT_ALERT_CAPACITY;
use crate::playback::PlaybackConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Persistent replay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Initial speed multiplier
    pub speed: f64,
    pub tick_interval_ms: u64,
    pub alert_capacity: usize,
    pub loop_playback: bool,
    /// Directory scanned for trip files when none is given on the command line
    pub trips_dir: Option<PathBuf>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            tick_interval_ms: 16,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            loop_playback: false,
            trips_dir: None,
        }
    }
}

impl ReplayConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fleet-replay").join("settings.json"))
    }

    /// Load settings from the user config dir, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring settings: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            speed: self.speed,
            loop_playback: self.loop_playback,
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            alert_capacity: self.alert_capacity,
        }
    }
}
