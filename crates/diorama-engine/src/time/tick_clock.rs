use std::time::{Duration, Instant};

/// Snapshot taken when a scheduled tick fires.
#[derive(Debug, Copy, Clone)]
pub struct TickTime {
    /// Instant the tick was observed.
    pub now: Instant,

    /// Deadline the tick was scheduled for.
    pub scheduled: Instant,

    /// Monotonic tick counter across cadence changes.
    pub tick_index: u64,
}

impl TickTime {
    /// How late the tick fired relative to its deadline.
    pub fn lateness(&self) -> Duration {
        self.now.saturating_duration_since(self.scheduled)
    }
}

/// Fixed-cadence deadline clock.
///
/// Produces one deadline at a time. When the caller falls behind by more than
/// one interval (debugger pause, backgrounded host, long draw) the missed
/// deadlines are coalesced into a single tick and the next deadline is
/// re-based on `now` instead of firing a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    next: Instant,
    tick_index: u64,
}

impl TickClock {
    /// Creates a clock whose first deadline is one `interval` after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        debug_assert!(!interval.is_zero(), "tick interval must be non-zero");
        Self {
            interval,
            next: now + interval,
            tick_index: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next deadline.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Switches cadence and re-bases the next deadline on `now`.
    ///
    /// The tick counter is preserved.
    pub fn reset(&mut self, interval: Duration, now: Instant) {
        debug_assert!(!interval.is_zero(), "tick interval must be non-zero");
        self.interval = interval;
        self.next = now + interval;
    }

    /// Consumes the current deadline if it is due.
    pub fn tick(&mut self, now: Instant) -> Option<TickTime> {
        if !self.is_due(now) {
            return None;
        }

        let scheduled = self.next;
        let following = scheduled + self.interval;

        // Coalesce missed deadlines.
        self.next = if following <= now {
            now + self.interval
        } else {
            following
        };

        let tt = TickTime {
            now,
            scheduled,
            tick_index: self.tick_index,
        };
        self.tick_index = self.tick_index.wrapping_add(1);

        Some(tt)
    }
}
