//! Render pipelines for the four glyph program variants.

use crate::targets::{TargetKind, Targets};
use crate::uniforms::GlyphUniformStd140;
use glyphcloud::device::Pass;

/// Vertex stream layouts: position, color, glyph offset, pick-id bytes.
const STREAM_LAYOUTS: [wgpu::VertexBufferLayout<'static>; 4] = [
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            shader_location: 0,
            offset: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            shader_location: 1,
            offset: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    },
    wgpu::VertexBufferLayout {
        array_stride: 8,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            shader_location: 2,
            offset: 0,
            format: wgpu::VertexFormat::Float32x2,
        }],
    },
    // The u32 id is read as four normalised bytes (little-endian).
    wgpu::VertexBufferLayout {
        array_stride: 4,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            shader_location: 3,
            offset: 0,
            format: wgpu::VertexFormat::Unorm8x4,
        }],
    },
];

/// Shader module and layouts shared by every glyph pipeline.
pub struct GlyphPipelines {
    shader: wgpu::ShaderModule,
    pub uniform_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
}

impl GlyphPipelines {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Glyph UBO Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<GlyphUniformStd140>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shaders/glyph_points.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/glyph_points.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glyph PipelineLayout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        Self {
            shader,
            uniform_layout,
            pipeline_layout,
        }
    }

    /// Builds the pipeline for one `(pass, projection)` variant.
    pub fn create(&self, device: &wgpu::Device, pass: Pass, orthographic: bool) -> wgpu::RenderPipeline {
        let (vs, label) = match (pass, orthographic) {
            (Pass::Draw, false) => ("vs_perspective", "Glyph Draw Perspective Pipeline"),
            (Pass::Draw, true) => ("vs_orthographic", "Glyph Draw Orthographic Pipeline"),
            (Pass::Pick, false) => ("vs_perspective", "Glyph Pick Perspective Pipeline"),
            (Pass::Pick, true) => ("vs_orthographic", "Glyph Pick Orthographic Pipeline"),
        };
        let fs = match pass {
            Pass::Draw => "fs_draw",
            Pass::Pick => "fs_pick",
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: vs,
                buffers: &STREAM_LAYOUTS,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Targets::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: fs,
                targets: &[Some(wgpu::ColorTargetState {
                    format: Targets::COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }
}

/// Target a pass renders into.
pub fn target_of(pass: Pass) -> TargetKind {
    match pass {
        Pass::Draw => TargetKind::Color,
        Pass::Pick => TargetKind::Pick,
    }
}
