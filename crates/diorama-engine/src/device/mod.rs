//! Graphics context ownership.
//!
//! This module is responsible for:
//! - the renderer contract (`RenderBackend`) and its move-only resource handles
//! - `RenderContext`, which binds a host surface and owns everything drawn into it
//! - creating the wgpu Instance/Adapter/Device/Queue and configuring the Surface

mod backend;
mod context;
mod error;
mod gpu;
mod init;
mod surface;

pub use backend::{DrawItem, FramePacket, GraphicsSurface, MeshHandle, RenderBackend, TextureHandle};
pub use context::{ContextState, RenderContext};
pub use error::SurfaceErrorAction;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use wgpu::{PowerPreference, PresentMode};
