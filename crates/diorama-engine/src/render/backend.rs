use std::sync::Arc;

use winit::window::Window;

use crate::coords::SurfaceSize;
use crate::core::{ContextCreationError, ContextLost};
use crate::device::{
    FramePacket, Gpu, GpuInit, GraphicsSurface, MeshHandle, RenderBackend, TextureHandle,
};
use crate::paint::ImageData;
use crate::scene::MeshData;

use super::blit::BlitRenderer;
use super::mesh::MeshRenderer;
use super::resources::{GpuMesh, GpuTexture, Slots};
use super::target::OffscreenTarget;
use super::{RenderCtx, RenderTarget};

/// A winit window waiting to be bound to the GPU.
#[derive(Debug, Clone)]
pub struct WindowSurface {
    window: Arc<Window>,
    init: GpuInit,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>, init: GpuInit) -> Self {
        Self { window, init }
    }
}

impl GraphicsSurface for WindowSurface {
    type Backend = GpuBackend;

    fn bind(self) -> Result<GpuBackend, ContextCreationError> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(ContextCreationError::SurfaceUnavailable("window has zero size".into()));
        }

        let gpu = pollster::block_on(Gpu::new(self.window, self.init)).map_err(ContextCreationError::RendererBind)?;
        Ok(GpuBackend::new(gpu))
    }
}

/// wgpu implementation of [`RenderBackend`].
///
/// `draw` renders into an offscreen target; `present` blits that target to
/// the next surface texture.
pub struct GpuBackend {
    gpu: Gpu,
    mesh_renderer: MeshRenderer,
    blit: BlitRenderer,
    offscreen: OffscreenTarget,
    meshes: Slots<GpuMesh>,
    textures: Slots<GpuTexture>,
}

impl GpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        let offscreen = OffscreenTarget::new(gpu.device(), gpu.surface_format(), gpu.size());
        let mut blit = BlitRenderer::new();
        {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            blit.set_source(&ctx, &offscreen.color_view);
        }

        Self {
            gpu,
            mesh_renderer: MeshRenderer::new(),
            blit,
            offscreen,
            meshes: Slots::default(),
            textures: Slots::default(),
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }
}

impl RenderBackend for GpuBackend {
    fn surface_size(&self) -> SurfaceSize {
        self.gpu.size()
    }

    fn upload_mesh(&mut self, mesh: &MeshData) -> anyhow::Result<MeshHandle> {
        let gpu_mesh = GpuMesh::upload(self.gpu.device(), mesh)?;
        Ok(MeshHandle::from_raw(self.meshes.insert(gpu_mesh)))
    }

    fn upload_texture(&mut self, image: &ImageData) -> anyhow::Result<TextureHandle> {
        let ctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
        let texture = self.mesh_renderer.upload_texture(&ctx, image)?;
        Ok(TextureHandle::from_raw(self.textures.insert(texture)))
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        match self.meshes.remove(mesh.raw()) {
            Some(m) => m.destroy(),
            None => log::warn!("release of unknown mesh {}", mesh.raw()),
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        match self.textures.remove(texture.raw()) {
            Some(t) => t.destroy(),
            None => log::warn!("release of unknown texture {}", texture.raw()),
        }
    }

    fn draw(&mut self, frame: &FramePacket<'_>) {
        let ctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("diorama draw encoder"),
        });

        {
            let mut target =
                RenderTarget::new(&mut encoder, &self.offscreen.color_view).with_depth(&self.offscreen.depth_view);
            self.mesh_renderer
                .render(&ctx, &mut target, frame, &self.meshes, &self.textures);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn present(&mut self) -> Result<(), ContextLost> {
        if self.gpu.size().is_empty() {
            // Minimized; nothing to show but the surface is still ours.
            return Ok(());
        }

        let frame = match self.gpu.acquire() {
            Ok(frame) => frame,
            Err(e) => return self.gpu.handle_surface_error(e).into_present_result(),
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let ctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("diorama present encoder"),
        });
        {
            let mut target = RenderTarget::new(&mut encoder, &view);
            self.blit.render(&ctx, &mut target);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.gpu.resize(size);
        if size.is_empty() || size == self.offscreen.size() {
            return;
        }

        self.offscreen = OffscreenTarget::new(self.gpu.device(), self.gpu.surface_format(), size);
        let ctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
        self.blit.set_source(&ctx, &self.offscreen.color_view);
    }
}

impl Drop for GpuBackend {
    fn drop(&mut self) {
        let (meshes, textures) = (self.meshes.len(), self.textures.len());
        if meshes + textures > 0 {
            log::warn!("gpu backend dropped with {meshes} meshes and {textures} textures still live");
        }
    }
}
