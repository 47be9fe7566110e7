use crate::job::EpochMillis;

/// A repeating timer driven by an external clock.
///
/// The ticker holds at most one pending deadline, so starting it twice never
/// schedules two firings. The owner polls it with [`Ticker::fire`] whenever the
/// clock reaches [`Ticker::next_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    period_ms: i64,
    next_due: Option<EpochMillis>,
}

impl Ticker {
    pub const fn new(period_ms: i64) -> Self {
        Self {
            period_ms,
            next_due: None,
        }
    }

    /// Schedules the first firing one period from `now`. Returns `false` if already active.
    pub fn start(&mut self, now: EpochMillis) -> bool {
        if self.next_due.is_some() {
            return false;
        }
        self.next_due = Some(now + self.period_ms.max(1));
        true
    }

    /// Clears the handle. Returns `true` if the ticker was active.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<EpochMillis> {
        self.next_due
    }

    pub fn period_ms(&self) -> i64 {
        self.period_ms
    }

    /// Returns `true` once per elapsed deadline and schedules the next one.
    ///
    /// Missed periods collapse into a single firing.
    pub fn fire(&mut self, now: EpochMillis) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let period = self.period_ms.max(1);
        let mut next = due + period;
        if next <= now {
            next = now + period;
        }
        self.next_due = Some(next);
        true
    }
}
