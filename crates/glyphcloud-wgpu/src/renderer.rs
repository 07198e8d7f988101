//! Headless renderer: owns the GPU context, offscreen targets and pipelines,
//! and hands out the device resources a `RenderModel` is built from.

use crate::context::GfxContext;
use crate::pipelines::GlyphPipelines;
use crate::resources::{Wgpu, WgpuBuffer, WgpuProgram, WgpuVertexArray};
use crate::targets::{TargetKind, Targets};
use anyhow::Result;
use glyphcloud::device::{Pass, ProgramSet, VertexStreams};
use glyphcloud::{GlyphCatalog, ModelDefaults, ModelResources, PointCloudOptions, RenderModel};
use std::sync::Arc;

pub struct HeadlessRenderer {
    pub gfx: Arc<GfxContext>,
    pub targets: Arc<Targets>,
    pipelines: GlyphPipelines,
}

impl HeadlessRenderer {
    pub async fn new(size: [u32; 2]) -> Result<Self> {
        let gfx = Arc::new(GfxContext::new_headless().await?);
        let targets = Arc::new(Targets::new(&gfx.device, size));
        let pipelines = GlyphPipelines::new(&gfx.device);

        let renderer = Self {
            gfx,
            targets,
            pipelines,
        };
        renderer.clear();
        Ok(renderer)
    }

    /// Blocking wrapper around [`HeadlessRenderer::new`].
    pub fn new_blocking(size: [u32; 2]) -> Result<Self> {
        pollster::block_on(Self::new(size))
    }

    pub fn size(&self) -> [u32; 2] {
        self.targets.size
    }

    fn program(&self, pass: Pass, orthographic: bool) -> WgpuProgram {
        let pipeline = self.pipelines.create(&self.gfx.device, pass, orthographic);
        WgpuProgram::new(self.gfx.clone(), pass, pipeline, &self.pipelines.uniform_layout)
    }

    /// Fresh programs, buffers and vertex array for one model.
    pub fn model_resources(&self) -> ModelResources<Wgpu> {
        let buffer = |label: &'static str| WgpuBuffer::new(self.gfx.clone(), label);
        ModelResources {
            programs: ProgramSet {
                perspective: self.program(Pass::Draw, false),
                orthographic: self.program(Pass::Draw, true),
                pick_perspective: self.program(Pass::Pick, false),
                pick_orthographic: self.program(Pass::Pick, true),
            },
            streams: VertexStreams {
                position: buffer("Glyph Positions"),
                color: buffer("Glyph Colors"),
                glyph: buffer("Glyph Offsets"),
                id: buffer("Glyph Pick Ids"),
            },
            vao: WgpuVertexArray::new(self.gfx.clone(), self.targets.clone()),
        }
    }

    /// Builds a model on this renderer and uploads its first point set.
    pub fn create_model<C: GlyphCatalog + ?Sized>(
        &self,
        defaults: ModelDefaults,
        catalog: &C,
        options: &PointCloudOptions,
    ) -> Result<RenderModel<Wgpu>> {
        Ok(RenderModel::create(self.model_resources(), defaults, catalog, options)?)
    }

    /// Clears the color target and resets the pick target to "no point".
    pub fn clear(&self) {
        self.targets.clear(&self.gfx.device, &self.gfx.queue);
    }

    /// Raw pick-id under pixel `(x, y)` of the pick target.
    pub fn read_pick_id(&self, x: u32, y: u32) -> Result<u32> {
        let texel = self
            .targets
            .read_texel(&self.gfx.device, &self.gfx.queue, TargetKind::Pick, x, y)?;
        Ok(glyphcloud::pick::from_rgba8(texel))
    }

    /// RGBA8 color under pixel `(x, y)` of the color target.
    pub fn read_color(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        self.targets
            .read_texel(&self.gfx.device, &self.gfx.queue, TargetKind::Color, x, y)
    }
}
