use std::time::Duration;

use serde::Deserialize;

/// Fixed pause inserted every `every` scanned drawing entities.
///
/// Large scans against a shared host document otherwise starve the host.
/// This is a flat sleep on the calling thread, not back-pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanThrottle {
    /// Entities between pauses. `0` disables the throttle.
    pub every: usize,
    /// Pause length in milliseconds.
    pub pause_ms: u64,
}

impl Default for ScanThrottle {
    fn default() -> Self {
        Self {
            every: 1000,
            pause_ms: 10,
        }
    }
}

impl ScanThrottle {
    /// A throttle that never pauses.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            every: 0,
            pause_ms: 0,
        }
    }

    /// Returns `true` if the scan should pause after `scanned` entities.
    #[must_use]
    pub fn should_pause(&self, scanned: usize) -> bool {
        self.every > 0 && self.pause_ms > 0 && scanned > 0 && scanned % self.every == 0
    }

    /// Blocks the calling thread if `scanned` is a pause point.
    pub fn tick(&self, scanned: usize) {
        if self.should_pause(scanned) {
            tracing::debug!(scanned, pause_ms = self.pause_ms, "Pausing entity scan");
            std::thread::sleep(Duration::from_millis(self.pause_ms));
        }
    }
}
