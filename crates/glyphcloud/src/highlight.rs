//! Uniform payload for single-point highlighting.
//!
//! The fragment stage compares the per-vertex id (four normalised bytes)
//! against `id`; an exact match swaps the vertex color for `color`.

/// Highlight uniforms consumed by the draw pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightState {
    /// `(byte0, byte1, byte2, layer) / 255` of the highlighted id.
    pub id: [f32; 4],
    pub color: [f32; 3],
}

impl HighlightState {
    /// Matches no vertex: all-ones is reserved and never highlights a point.
    pub const NONE: Self = Self {
        id: [1.0; 4],
        color: [0.0; 3],
    };

    /// Highlights point `index` of the model on `layer`, or nothing when
    /// `index` is `None`. The color defaults to black.
    pub fn encode(index: Option<u32>, layer: u8, color: Option<[f32; 3]>) -> Self {
        let Some(index) = index else {
            return Self::NONE;
        };
        let [a0, a1, a2, _] = index.to_le_bytes();
        Self {
            id: [
                a0 as f32 / 255.0,
                a1 as f32 / 255.0,
                a2 as f32 / 255.0,
                layer as f32 / 255.0,
            ],
            color: color.unwrap_or([0.0; 3]),
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for HighlightState {
    fn default() -> Self {
        Self::NONE
    }
}
