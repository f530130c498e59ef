//! winit host for a single scene window.

mod pointer;
mod remount;
mod runtime;

pub use pointer::{PointerAction, PointerTracker, DRAG_THRESHOLD, WHEEL_IDLE, WHEEL_STEP};
pub use remount::{RemountPolicy, SURVIVAL_PRESENTS};
pub use runtime::{Runtime, RuntimeConfig, SceneHost};
