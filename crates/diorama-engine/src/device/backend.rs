use glam::Mat4;

use crate::coords::SurfaceSize;
use crate::core::{ContextCreationError, ContextLost};
use crate::paint::{Color, ImageData};
use crate::scene::{MeshData, SortKey};

/// Owning handle to a mesh uploaded into a backend.
///
/// Deliberately neither `Copy` nor `Clone`: a handle is owned by exactly one
/// scene node and is consumed by [`RenderBackend::release_mesh`], so a
/// double release does not type-check.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a MeshHandle leaks the backend resource"]
pub struct MeshHandle(u32);

/// Owning handle to a texture uploaded into a backend. See [`MeshHandle`].
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a TextureHandle leaks the backend resource"]
pub struct TextureHandle(u32);

impl MeshHandle {
    /// Backends mint handles from their own slot ids.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl TextureHandle {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// One mesh draw within a frame.
#[derive(Debug)]
pub struct DrawItem<'a> {
    pub key: SortKey,
    pub mesh: &'a MeshHandle,
    pub texture: Option<&'a TextureHandle>,
    pub tint: Color,
    pub model: Mat4,
}

/// Everything a backend needs to draw one frame.
///
/// `items` are already in paint order.
#[derive(Debug)]
pub struct FramePacket<'a> {
    pub view_proj: Mat4,
    pub clear: Color,
    pub items: &'a [DrawItem<'a>],
}

/// Renderer bound to one host surface.
///
/// All calls happen on the graphics thread that created the backend.
pub trait RenderBackend {
    fn surface_size(&self) -> SurfaceSize;

    fn upload_mesh(&mut self, mesh: &MeshData) -> anyhow::Result<MeshHandle>;

    fn upload_texture(&mut self, image: &ImageData) -> anyhow::Result<TextureHandle>;

    /// Frees host memory for `mesh` now, on this thread.
    fn release_mesh(&mut self, mesh: MeshHandle);

    fn release_texture(&mut self, texture: TextureHandle);

    /// Records and submits the frame. The result becomes visible on the next
    /// successful [`present`](Self::present).
    fn draw(&mut self, frame: &FramePacket<'_>);

    /// Hands the most recent frame to the host compositor.
    ///
    /// Must be called periodically even when nothing was drawn, or the host
    /// reclaims the surface. An error means the surface is gone for good.
    fn present(&mut self) -> Result<(), ContextLost>;

    /// The host surface changed size.
    fn resize(&mut self, size: SurfaceSize) {
        let _ = size;
    }
}

/// Host-provided surface that can be bound into a renderer.
pub trait GraphicsSurface {
    type Backend: RenderBackend;

    fn bind(self) -> Result<Self::Backend, ContextCreationError>;
}
