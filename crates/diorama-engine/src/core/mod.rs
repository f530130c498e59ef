//! Engine-facing contracts.
//!
//! Configuration, the outbound event interface, and the error taxonomy shared
//! by the session, the render thread and the host runtime.

mod config;
mod error;
mod events;

pub use config::SceneConfig;
pub use error::{ContextCreationError, ContextLost, ResourceResolutionError};
pub use events::{SceneEvent, SceneEvents};
