use std::time::{Duration, SystemTime, UNIX_EPOCH};

use panel_core::EpochMillis;
use tokio::time::Instant;

/// Wall-clock milliseconds derived from tokio's monotonic clock.
///
/// The epoch offset is sampled once; afterwards time only advances through
/// [`tokio::time::Instant`], so a paused test runtime drives it like a fake clock.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch_at_start: EpochMillis,
    started: Instant,
}

impl Clock {
    pub fn system() -> Self {
        let epoch_at_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since| i64::try_from(since.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Self::starting_at(epoch_at_start)
    }

    pub fn starting_at(epoch_at_start: EpochMillis) -> Self {
        Self {
            epoch_at_start,
            started: Instant::now(),
        }
    }

    pub fn now_millis(&self) -> EpochMillis {
        let elapsed = i64::try_from(self.started.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.epoch_at_start.saturating_add(elapsed)
    }

    /// The monotonic instant at which `now_millis` reaches `at`.
    pub fn instant_at(&self, at: EpochMillis) -> Instant {
        let offset = u64::try_from(at - self.epoch_at_start).unwrap_or(0);
        self.started + Duration::from_millis(offset)
    }
}
