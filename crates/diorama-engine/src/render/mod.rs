//! GPU rendering subsystem.
//!
//! `GpuBackend` implements `device::RenderBackend` on top of wgpu. Each
//! renderer owns its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - geometry is in world units (meters), right-handed, +Y up
//! - the scene is drawn offscreen; presenting blits it to the surface

mod backend;
mod blit;
mod ctx;
mod mesh;
mod resources;
mod target;

pub use backend::{GpuBackend, WindowSurface};
pub(crate) use ctx::{RenderCtx, RenderTarget};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
