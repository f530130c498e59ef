//! Gesture input.
//!
//! Events arrive already classified (pan / pinch). The mapper turns them into
//! orbit camera updates and tells the scheduler when the high-rate loop should
//! start and stop. Platform translation (winit mouse/wheel) lives in `window`.

mod mapper;
mod types;

pub use mapper::{GestureMapper, LoopSignal};
pub use types::{GestureEvent, GesturePhase, GestureStream};
