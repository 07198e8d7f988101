//! Graphics-device collaborators a `RenderModel` draws through.
//!
//! The model never talks to a graphics API directly; a backend provides
//! vertex buffers, compiled shader programs and a vertex-array object that
//! binds the four glyph streams and issues triangle-list draws.

use crate::highlight::HighlightState;
use glam::Mat4;

/// Flat numeric payload for one vertex stream.
#[derive(Debug, Clone, Copy)]
pub enum BufferData<'a> {
    F32(&'a [f32]),
    U32(&'a [u32]),
}

impl<'a> BufferData<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Self::F32(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A device buffer whose contents are replaced wholesale on every update.
pub trait VertexBuffer {
    fn update(&mut self, data: BufferData<'_>);
    fn dispose(self);
}

/// A compiled shader program. `bind` makes it current and writes uniforms.
pub trait ShaderProgram {
    fn bind(&mut self, uniforms: &Uniforms);
    fn dispose(self);
}

/// Binds the glyph streams and draws `vertex_count` vertices as a triangle
/// list with the given (already bound) program.
pub trait VertexArray<B, P> {
    fn draw(&mut self, program: &P, streams: &VertexStreams<B>, vertex_count: u32);
    fn dispose(self);
}

/// Resource types of one graphics backend.
pub trait RenderDevice {
    type Buffer: VertexBuffer;
    type Program: ShaderProgram;
    type VertexArray: VertexArray<Self::Buffer, Self::Program>;
}

/// Attribute streams, bound at shader locations 0..=3 in this order.
#[derive(Debug)]
pub struct VertexStreams<B> {
    /// `vec3<f32>` world position.
    pub position: B,
    /// `vec3<f32>` RGB color.
    pub color: B,
    /// `vec2<f32>` glyph-local offset, already scaled by point size.
    pub glyph: B,
    /// `u32` pick-id, read as four normalised bytes.
    pub id: B,
}

/// Which fragment stage a program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Shaded colors with highlight substitution.
    Draw,
    /// Pick-ids only, into an offscreen target.
    Pick,
}

/// The four program variants: {perspective, orthographic} × {draw, pick}.
#[derive(Debug)]
pub struct ProgramSet<P> {
    pub perspective: P,
    pub orthographic: P,
    pub pick_perspective: P,
    pub pick_orthographic: P,
}

impl<P> ProgramSet<P> {
    pub fn select_mut(&mut self, pass: Pass, orthographic: bool) -> &mut P {
        match (pass, orthographic) {
            (Pass::Draw, false) => &mut self.perspective,
            (Pass::Draw, true) => &mut self.orthographic,
            (Pass::Pick, false) => &mut self.pick_perspective,
            (Pass::Pick, true) => &mut self.pick_orthographic,
        }
    }

    pub fn into_array(self) -> [P; 4] {
        [
            self.perspective,
            self.orthographic,
            self.pick_perspective,
            self.pick_orthographic,
        ]
    }
}

/// Camera matrices for one draw; absent matrices default to identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub model: Option<Mat4>,
    pub view: Option<Mat4>,
    pub projection: Option<Mat4>,
    /// Drawing-buffer size in physical pixels.
    pub viewport: [u32; 2],
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            model: None,
            view: None,
            projection: None,
            viewport: [1, 1],
        }
    }
}

/// Uniform values handed to a program on bind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// `2 / viewport`, the clip-space size of one pixel.
    pub screen_size: [f32; 2],
    /// Present for the draw pass only.
    pub highlight: Option<HighlightState>,
}

impl Uniforms {
    pub fn new(camera: &Camera, highlight: Option<HighlightState>) -> Self {
        let [w, h] = camera.viewport;
        Self {
            model: camera.model.unwrap_or(Mat4::IDENTITY),
            view: camera.view.unwrap_or(Mat4::IDENTITY),
            projection: camera.projection.unwrap_or(Mat4::IDENTITY),
            screen_size: [2.0 / w.max(1) as f32, 2.0 / h.max(1) as f32],
            highlight,
        }
    }
}
