//! Frame scheduling.
//!
//! Two cadences share one dirty flag: a slow keep-alive heartbeat while idle,
//! and a fast loop while a gesture is in progress. Every tick presents; only
//! ticks that observe a change draw.

mod dirty;
mod scheduler;

pub use dirty::DirtyFlag;
pub use scheduler::{FrameDecision, FrameScheduler, SchedulerConfig, SchedulerMode};
