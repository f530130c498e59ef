//! Time subsystem.
//!
//! Fixed-cadence deadline tracking for the frame scheduler, kept separate from
//! any event loop so it can be driven with synthetic instants in tests.

mod tick_clock;

pub use tick_clock::{TickClock, TickTime};
