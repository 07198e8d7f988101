//! Offscreen render targets for the draw and pick passes.

use anyhow::{anyhow, Context, Result};

/// Row pitch wgpu requires for texture-to-buffer copies.
const READBACK_ROW_BYTES: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Which color target a pass renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Color,
    Pick,
}

pub struct Targets {
    // Backing textures for the views below.
    color_tex: wgpu::Texture,
    pick_tex: wgpu::Texture,
    _color_depth_tex: wgpu::Texture,
    _pick_depth_tex: wgpu::Texture,

    pub color: wgpu::TextureView,
    pub pick: wgpu::TextureView,
    pub color_depth: wgpu::TextureView,
    pub pick_depth: wgpu::TextureView,

    pub size: [u32; 2],
}

impl Targets {
    /// RGBA8 so that pick texels hold the exact id bytes.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Pick texels outside any glyph read back as `u32::MAX`, the reserved id.
    pub const PICK_CLEAR: wgpu::Color = wgpu::Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn new(device: &wgpu::Device, size: [u32; 2]) -> Self {
        // Ensure non‑zero dimensions.
        let width = size[0].max(1);
        let height = size[1].max(1);

        let tex_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        // Helper to create a texture with the given parameters.
        let create_tex = |label: &str, format, usage| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: tex_size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };

        let readable = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC;
        let color_tex = create_tex("Glyph Color Target", Self::COLOR_FORMAT, readable);
        let pick_tex = create_tex("Glyph Pick Target", Self::COLOR_FORMAT, readable);
        let color_depth_tex = create_tex(
            "Glyph Color Depth",
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let pick_depth_tex = create_tex(
            "Glyph Pick Depth",
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        let view = |t: &wgpu::Texture| t.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            color: view(&color_tex),
            pick: view(&pick_tex),
            color_depth: view(&color_depth_tex),
            pick_depth: view(&pick_depth_tex),
            color_tex,
            pick_tex,
            _color_depth_tex: color_depth_tex,
            _pick_depth_tex: pick_depth_tex,
            size: [width, height],
        }
    }

    /// Color and depth views a pass of `kind` renders into.
    pub fn views(&self, kind: TargetKind) -> (&wgpu::TextureView, &wgpu::TextureView) {
        match kind {
            TargetKind::Color => (&self.color, &self.color_depth),
            TargetKind::Pick => (&self.pick, &self.pick_depth),
        }
    }

    /// Clears both targets: color to transparent black, pick to all ones.
    pub fn clear(&self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Glyph Clear Encoder"),
        });

        for (kind, clear) in [
            (TargetKind::Color, wgpu::Color::TRANSPARENT),
            (TargetKind::Pick, Self::PICK_CLEAR),
        ] {
            let (color, depth) = self.views(kind);
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glyph Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Copies one texel of the `kind` target back to the CPU.
    pub fn read_texel(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        kind: TargetKind,
        x: u32,
        y: u32,
    ) -> Result<[u8; 4]> {
        let [width, height] = self.size;
        if x >= width || y >= height {
            return Err(anyhow!("texel ({x}, {y}) outside {width}x{height} target"));
        }

        let texture = match kind {
            TargetKind::Color => &self.color_tex,
            TargetKind::Pick => &self.pick_tex,
        };

        // Staging buffer for a single texel; one aligned row.
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glyph Readback Buffer"),
            size: READBACK_ROW_BYTES as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Glyph Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(READBACK_ROW_BYTES),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..4);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let data = slice.get_mapped_range();
        let texel = [data[0], data[1], data[2], data[3]];
        drop(data);
        staging.unmap();

        Ok(texel)
    }
}
