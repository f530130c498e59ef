use crate::core::ContextLost;

/// What a failed surface acquire means for the current present.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The swapchain was rebuilt at the current size; try again next tick.
    Reconfigured,
    /// Nothing to show this tick. The surface is still ours.
    SkipFrame,
    /// The host reclaimed the surface or the device ran out of memory.
    Lost,
}

impl SurfaceErrorAction {
    /// Folds the action into a present outcome. Only `Lost` ends the context.
    pub fn into_present_result(self) -> Result<(), ContextLost> {
        match self {
            Self::Reconfigured | Self::SkipFrame => Ok(()),
            Self::Lost => Err(ContextLost),
        }
    }
}
