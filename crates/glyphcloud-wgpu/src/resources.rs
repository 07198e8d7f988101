//! wgpu implementations of the glyphcloud device traits.

use crate::context::GfxContext;
use crate::pipelines::target_of;
use crate::targets::Targets;
use crate::uniforms::GlyphUniformStd140;
use glyphcloud::device::{
    BufferData, Pass, RenderDevice, ShaderProgram, Uniforms, VertexArray, VertexBuffer,
    VertexStreams,
};
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// Marker type selecting the wgpu backend for `RenderModel`.
pub struct Wgpu;

impl RenderDevice for Wgpu {
    type Buffer = WgpuBuffer;
    type Program = WgpuProgram;
    type VertexArray = WgpuVertexArray;
}

/// Vertex buffer that grows on demand and is rewritten in place otherwise.
pub struct WgpuBuffer {
    gfx: Arc<GfxContext>,
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    len: u64,
}

impl WgpuBuffer {
    pub fn new(gfx: Arc<GfxContext>, label: &'static str) -> Self {
        Self {
            gfx,
            label,
            buffer: None,
            len: 0,
        }
    }

    /// The valid part of the buffer, if it holds any data.
    pub fn slice(&self) -> Option<wgpu::BufferSlice<'_>> {
        match &self.buffer {
            Some(buffer) if self.len > 0 => Some(buffer.slice(..self.len)),
            _ => None,
        }
    }

    pub fn len_bytes(&self) -> u64 {
        self.len
    }
}

impl VertexBuffer for WgpuBuffer {
    fn update(&mut self, data: BufferData<'_>) {
        let bytes = data.as_bytes();
        self.len = bytes.len() as u64;
        if bytes.is_empty() {
            return;
        }

        if let Some(buffer) = self.buffer.as_ref().filter(|b| b.size() >= self.len) {
            self.gfx.queue.write_buffer(buffer, 0, bytes);
            return;
        }

        if let Some(old) = self.buffer.take() {
            old.destroy();
        }
        log::trace!("{}: allocating {} bytes", self.label, bytes.len());
        self.buffer = Some(self.gfx.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some(self.label),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            },
        ));
    }

    fn dispose(self) {
        if let Some(buffer) = self.buffer {
            buffer.destroy();
        }
    }
}

/// One compiled pipeline plus its uniform buffer.
pub struct WgpuProgram {
    gfx: Arc<GfxContext>,
    pass: Pass,
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    bind: wgpu::BindGroup,
}

impl WgpuProgram {
    pub fn new(
        gfx: Arc<GfxContext>,
        pass: Pass,
        pipeline: wgpu::RenderPipeline,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let ubo = gfx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glyph UBO"),
            contents: bytemuck::bytes_of(&GlyphUniformStd140::from(&Uniforms::new(
                &Default::default(),
                None,
            ))),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind = gfx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Glyph BindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        Self {
            gfx,
            pass,
            pipeline,
            ubo,
            bind,
        }
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }
}

impl ShaderProgram for WgpuProgram {
    fn bind(&mut self, uniforms: &Uniforms) {
        let data = GlyphUniformStd140::from(uniforms);
        self.gfx.queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&data));
    }

    fn dispose(self) {
        self.ubo.destroy();
    }
}

/// Issues one render pass per draw into the shared offscreen targets.
pub struct WgpuVertexArray {
    gfx: Arc<GfxContext>,
    targets: Arc<Targets>,
}

impl WgpuVertexArray {
    pub fn new(gfx: Arc<GfxContext>, targets: Arc<Targets>) -> Self {
        Self { gfx, targets }
    }
}

impl VertexArray<WgpuBuffer, WgpuProgram> for WgpuVertexArray {
    fn draw(&mut self, program: &WgpuProgram, streams: &VertexStreams<WgpuBuffer>, vertex_count: u32) {
        let (Some(position), Some(color), Some(glyph), Some(id)) = (
            streams.position.slice(),
            streams.color.slice(),
            streams.glyph.slice(),
            streams.id.slice(),
        ) else {
            log::debug!("skipping draw: vertex streams are empty");
            return;
        };

        let (color_view, depth_view) = self.targets.views(target_of(program.pass));
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glyph Draw Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glyph Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&program.pipeline);
            pass.set_bind_group(0, &program.bind, &[]);
            pass.set_vertex_buffer(0, position);
            pass.set_vertex_buffer(1, color);
            pass.set_vertex_buffer(2, glyph);
            pass.set_vertex_buffer(3, id);
            pass.draw(0..vertex_count, 0..1);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn dispose(self) {
        log::trace!("vertex array released");
    }
}
