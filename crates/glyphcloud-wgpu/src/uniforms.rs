//! GPU-side layout of the glyph uniforms.

use glyphcloud::{HighlightState, Uniforms};

/// Per-program uniform buffer data, respecting std140 layout.
/// Must match the layout of `GlyphUniform` in `glyph_points.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct GlyphUniformStd140 {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Clip-space size of one pixel (`2 / viewport`).
    pub screen_size: [f32; 2],
    pub _pad0: [f32; 2],
    /// Normalised id bytes of the highlighted point.
    pub highlight_id: [f32; 4],
    pub highlight_color: [f32; 3],
    pub _pad1: f32,
}

impl From<&Uniforms> for GlyphUniformStd140 {
    fn from(u: &Uniforms) -> Self {
        // Pick programs never read the highlight; the sentinel keeps it inert.
        let highlight = u.highlight.unwrap_or(HighlightState::NONE);
        Self {
            model: u.model.to_cols_array_2d(),
            view: u.view.to_cols_array_2d(),
            projection: u.projection.to_cols_array_2d(),
            screen_size: u.screen_size,
            _pad0: [0.0; 2],
            highlight_id: highlight.id,
            highlight_color: highlight.color,
            _pad1: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphcloud::Camera;

    #[test]
    fn test_std140_size_and_offsets() {
        assert_eq!(std::mem::size_of::<GlyphUniformStd140>(), 240);
        assert_eq!(std::mem::offset_of!(GlyphUniformStd140, screen_size), 192);
        assert_eq!(std::mem::offset_of!(GlyphUniformStd140, highlight_id), 208);
        assert_eq!(std::mem::offset_of!(GlyphUniformStd140, highlight_color), 224);
    }

    #[test]
    fn test_draw_uniforms_carry_highlight() {
        let camera = Camera {
            view: Some(glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0))),
            viewport: [640, 480],
            ..Camera::default()
        };
        let highlight = HighlightState::encode(Some(258), 4, Some([0.0, 1.0, 0.0]));
        let gpu = GlyphUniformStd140::from(&Uniforms::new(&camera, Some(highlight)));
        assert_eq!(gpu.view[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(gpu.highlight_id, [2.0 / 255.0, 1.0 / 255.0, 0.0, 4.0 / 255.0]);
        assert_eq!(gpu.highlight_color, [0.0, 1.0, 0.0]);
        assert_eq!(gpu.screen_size, [2.0 / 640.0, 2.0 / 480.0]);
    }

    #[test]
    fn test_pick_uniforms_use_sentinel() {
        let u = Uniforms::new(&Camera::default(), None);
        let gpu = GlyphUniformStd140::from(&u);
        assert_eq!(gpu.highlight_id, [1.0; 4]);
        assert_eq!(gpu.model, glam::Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(gpu.screen_size, [2.0, 2.0]);
    }
}
