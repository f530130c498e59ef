use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Coalescing "something changed" signal between producers and the renderer.
///
/// Producers call [`set`](Self::set) from any thread. The scheduler is the only
/// consumer and uses [`take`](Self::take), an atomic swap, so a `set` racing a
/// `take` is either observed by this tick or left set for the next one. It can
/// never be lost.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Reads and clears the flag in one step.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Non-consuming read, for diagnostics and tests.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
