use std::time::{Duration, Instant};

/// One-shot game clock. At most one tick is pending at any time; the loop
/// re-arms it after each tick, and stopping means simply not re-arming.
pub struct Ticker {
    period: Duration,
    due: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker { period, due: None }
    }

    /// Schedules the next tick one period after `now`, replacing any
    /// pending one.
    pub fn arm(&mut self, now: Instant) {
        self.due = Some(now + self.period);
    }

    pub fn disarm(&mut self) {
        self.due = None;
    }

    /// How long the loop may block waiting for input before the pending tick
    /// is due. `None` when nothing is scheduled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }

    /// Consumes the pending tick if it is due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
