//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GlyphCloudError {
    /// `update` was called without a position sequence, or with an empty one.
    #[error("point cloud update requires a non-empty `position` sequence")]
    MissingPositions,

    /// The glyph catalog has no mesh for this key.
    #[error("glyph {0:?} not found in catalog")]
    GlyphNotFound(String),

    /// A per-point attribute does not have one entry per position.
    #[error("`{attribute}` has {actual} entries but there are {expected} positions")]
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A glyph mesh cell references a vertex that does not exist.
    #[error("glyph mesh cell {cell} references vertex {index}, mesh has {vertex_count} vertices")]
    InvalidGlyphMesh {
        cell: usize,
        index: u32,
        vertex_count: usize,
    },

    /// Pick layers are 8-bit.
    #[error("pick layer {0} is outside 0..=255")]
    InvalidPickLayer(u64),
}

pub type Result<T, E = GlyphCloudError> = std::result::Result<T, E>;
