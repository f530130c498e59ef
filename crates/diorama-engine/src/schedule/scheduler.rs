use std::time::{Duration, Instant};

use crate::time::{TickClock, TickTime};

use super::dirty::DirtyFlag;

/// Tick cadences for the two regimes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SchedulerConfig {
    /// Keep-alive heartbeat while nothing is being manipulated.
    pub idle_interval: Duration,
    /// Loop rate while a gesture is in progress.
    pub active_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_interval: Duration::from_millis(250),
            active_interval: Duration::from_millis(33),
        }
    }
}

impl SchedulerConfig {
    /// Replaces zero intervals with the defaults.
    pub fn validated(self) -> Self {
        let d = Self::default();
        Self {
            idle_interval: if self.idle_interval.is_zero() { d.idle_interval } else { self.idle_interval },
            active_interval: if self.active_interval.is_zero() { d.active_interval } else { self.active_interval },
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SchedulerMode {
    Idle,
    Active,
    /// Context lost or unmounted. No more ticks.
    Stopped,
}

/// What the graphics thread must do for one tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameDecision {
    /// Draw the scene with the current camera, then present.
    Draw,
    /// Present only, to keep the surface alive.
    Present,
}

/// Decides when frames are drawn.
///
/// Owns the dirty flag's consuming side: the flag is cleared only when a draw
/// is decided, so a change is never lost and never drawn twice.
#[derive(Debug)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    mode: SchedulerMode,
    clock: TickClock,
    dirty: DirtyFlag,
    draws: u64,
}

impl FrameScheduler {
    pub fn new(config: SchedulerConfig, dirty: DirtyFlag, now: Instant) -> Self {
        let config = config.validated();
        Self {
            clock: TickClock::new(config.idle_interval, now),
            config,
            mode: SchedulerMode::Idle,
            dirty,
            draws: 0,
        }
    }

    pub fn mode(&self) -> SchedulerMode {
        self.mode
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Frames drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// When the next tick is due, or `None` once stopped.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.mode {
            SchedulerMode::Stopped => None,
            _ => Some(self.clock.deadline()),
        }
    }

    /// Switches to the high-rate loop.
    pub fn enter_active(&mut self, now: Instant) {
        if self.mode != SchedulerMode::Idle {
            return;
        }
        self.mode = SchedulerMode::Active;
        self.clock.reset(self.config.active_interval, now);
        log::debug!("scheduler: idle -> active");
    }

    /// Leaves the high-rate loop. Always returns a forced draw.
    pub fn exit_active(&mut self, now: Instant) -> Option<FrameDecision> {
        if self.mode != SchedulerMode::Active {
            return None;
        }
        self.mode = SchedulerMode::Idle;
        self.clock.reset(self.config.idle_interval, now);
        log::debug!("scheduler: active -> idle");

        // The forced frame covers any pending change.
        self.dirty.take();
        self.draws += 1;
        Some(FrameDecision::Draw)
    }

    /// Runs a tick if one is due.
    pub fn poll(&mut self, now: Instant) -> Option<FrameDecision> {
        if self.mode == SchedulerMode::Stopped {
            return None;
        }
        let tick: TickTime = self.clock.tick(now)?;
        if tick.lateness() > self.clock.interval() {
            log::trace!("tick {} late by {:?}", tick.tick_index, tick.lateness());
        }

        if self.dirty.take() {
            self.draws += 1;
            Some(FrameDecision::Draw)
        } else {
            Some(FrameDecision::Present)
        }
    }

    /// Stops ticking for good. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.mode == SchedulerMode::Stopped {
            return false;
        }
        self.mode = SchedulerMode::Stopped;
        true
    }
}
