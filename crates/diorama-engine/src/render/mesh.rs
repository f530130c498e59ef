use bytemuck::{Pod, Zeroable};

use crate::device::FramePacket;
use crate::scene::Vertex;

use super::resources::{GpuMesh, GpuTexture, Slots, linear_sampler, texture_bind_group_layout};
use super::{DEPTH_FORMAT, RenderCtx, RenderTarget};

/// Per-draw uniform slot stride; matches the default
/// `min_uniform_buffer_offset_alignment`.
const UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshUniform {
    mvp: [[f32; 4]; 4],
    tint: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<MeshUniform>() as u64 <= UNIFORM_STRIDE);

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Textured, tinted, depth-tested mesh renderer.
///
/// One uniform slot per draw item, bound with a dynamic offset. Untextured
/// items sample a 1×1 white texture so one pipeline covers both cases.
#[derive(Default)]
pub(crate) struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    uniform_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,

    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,

    sampler: Option<wgpu::Sampler>,
    white: Option<GpuTexture>,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads an image as a texture bindable by this renderer.
    pub(crate) fn upload_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        image: &crate::paint::ImageData,
    ) -> anyhow::Result<GpuTexture> {
        self.ensure_pipeline(ctx);
        let (Some(layout), Some(sampler)) = (self.texture_layout.as_ref(), self.sampler.as_ref()) else {
            anyhow::bail!("mesh pipeline unavailable");
        };
        GpuTexture::upload(ctx.device, ctx.queue, layout, sampler, image)
    }

    /// Clears the target and draws `frame.items` in order.
    pub(crate) fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &FramePacket<'_>,
        meshes: &Slots<GpuMesh>,
        textures: &Slots<GpuTexture>,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_white(ctx);
        self.ensure_uniforms(ctx, frame.items.len());
        self.write_uniforms(ctx, frame);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(uniform_bg) = self.uniform_bind_group.as_ref() else { return };
        let Some(white) = self.white.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("diorama mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(frame.clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: target.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);

        for (i, item) in frame.items.iter().enumerate() {
            let Some(mesh) = meshes.get(item.mesh.raw()) else {
                continue;
            };
            let texture_bg = item
                .texture
                .and_then(|t| textures.get(t.raw()))
                .map_or(&white.bind_group, |t| &t.bind_group);

            rpass.set_bind_group(0, uniform_bg, &[(i as u64 * UNIFORM_STRIDE) as u32]);
            rpass.set_bind_group(1, texture_bg, &[]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.color_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("diorama mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let uniform_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("diorama mesh uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MeshUniform>() as u64),
                },
                count: None,
            }],
        });
        let texture_layout = texture_bind_group_layout(ctx.device, "diorama mesh texture bgl");

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("diorama mesh pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("diorama mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Planes are viewed from both sides.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.sampler = Some(linear_sampler(ctx.device, "diorama mesh sampler"));
        self.pipeline_format = Some(ctx.color_format);
        self.pipeline = Some(pipeline);
        self.uniform_layout = Some(uniform_layout);
        self.texture_layout = Some(texture_layout);

        // Dependent bindings are rebuilt against the new layouts.
        self.uniform_buffer = None;
        self.uniform_bind_group = None;
        self.uniform_capacity = 0;
        self.white = None;
    }

    fn ensure_white(&mut self, ctx: &RenderCtx<'_>) {
        if self.white.is_some() {
            return;
        }
        let (Some(layout), Some(sampler)) = (self.texture_layout.as_ref(), self.sampler.as_ref()) else {
            return;
        };
        let white = crate::paint::ImageData::solid([255; 4]);
        match GpuTexture::upload(ctx.device, ctx.queue, layout, sampler, &white) {
            Ok(t) => self.white = Some(t),
            Err(e) => log::error!("failed to create fallback texture: {e:#}"),
        }
    }

    fn ensure_uniforms(&mut self, ctx: &RenderCtx<'_>, items: usize) {
        if items <= self.uniform_capacity && self.uniform_bind_group.is_some() {
            return;
        }
        let Some(layout) = self.uniform_layout.as_ref() else { return };

        let capacity = items.next_power_of_two().max(64);
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("diorama mesh uniforms"),
            size: capacity as u64 * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("diorama mesh uniform bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<MeshUniform>() as u64),
                }),
            }],
        });

        if let Some(old) = self.uniform_buffer.replace(buffer) {
            old.destroy();
        }
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = capacity;
    }

    fn write_uniforms(&self, ctx: &RenderCtx<'_>, frame: &FramePacket<'_>) {
        let Some(buffer) = self.uniform_buffer.as_ref() else { return };
        if frame.items.is_empty() {
            return;
        }

        let mut bytes = vec![0u8; frame.items.len() * UNIFORM_STRIDE as usize];
        for (i, item) in frame.items.iter().enumerate() {
            let u = MeshUniform {
                mvp: (frame.view_proj * item.model).to_cols_array_2d(),
                tint: item.tint.to_array(),
            };
            let at = i * UNIFORM_STRIDE as usize;
            bytes[at..at + std::mem::size_of::<MeshUniform>()].copy_from_slice(bytemuck::bytes_of(&u));
        }
        ctx.queue.write_buffer(buffer, 0, &bytes);
    }
}
