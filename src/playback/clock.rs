use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic real-time source for the playback tick loop
pub trait TimeSource: Send {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for deterministic playback.
///
/// Clones share the same time, so a test can keep one handle while the
/// engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    // f64 bits
    now: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: f64) {
        self.now.store(ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: f64) {
        self.set_ms(self.now_ms() + ms);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now.load(Ordering::SeqCst))
    }
}
