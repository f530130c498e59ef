use std::time::{Duration, Instant};

/// Successful presents a re-mounted session needs before it counts as
/// recovered and the back-off starts over.
pub const SURVIVAL_PRESENTS: u64 = 4;

/// Back-off bookkeeping for re-mounting after a lost context.
///
/// A re-mount that loses its context again before [`SURVIVAL_PRESENTS`]
/// presents counts as a failure, the same as a mount that errors. The delay
/// doubles with every consecutive failure and the policy gives up after
/// `max_failures`.
#[derive(Debug, Clone)]
pub struct RemountPolicy {
    backoff: Duration,
    max_failures: u32,
    failures: u32,
    on_probation: bool,
}

impl RemountPolicy {
    pub fn new(backoff: Duration, max_failures: u32) -> Self {
        Self {
            backoff,
            max_failures: max_failures.max(1),
            failures: 0,
            on_probation: false,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn on_probation(&self) -> bool {
        self.on_probation
    }

    /// A re-mount succeeded; the new session is on probation.
    pub fn mounted(&mut self) {
        self.on_probation = true;
    }

    /// Reports the mounted session's present count. Ends probation once the
    /// session has survived long enough.
    pub fn presented(&mut self, frames: u64) {
        if self.on_probation && frames >= SURVIVAL_PRESENTS {
            log::debug!("re-mounted scene survived {frames} presents; back-off reset");
            self.on_probation = false;
            self.failures = 0;
        }
    }

    /// The context was lost. Returns when to re-mount, or `None` to give up.
    pub fn lost(&mut self, now: Instant) -> Option<Instant> {
        if std::mem::take(&mut self.on_probation) {
            self.failures += 1;
        }
        self.next_attempt(now)
    }

    /// A re-mount attempt failed outright. Returns when to retry, or `None`.
    pub fn mount_failed(&mut self, now: Instant) -> Option<Instant> {
        self.on_probation = false;
        self.failures += 1;
        self.next_attempt(now)
    }

    fn next_attempt(&self, now: Instant) -> Option<Instant> {
        if self.failures >= self.max_failures {
            return None;
        }
        Some(now + self.backoff * (1u32 << self.failures.min(6)))
    }
}
