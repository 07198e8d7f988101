//! Glyph point clouds: labelled points drawn as small triangulated markers,
//! with GPU picking and single-point highlighting.
//!
//! - [`geometry`] expands a point set into four flat vertex streams
//!   (position, color, glyph offset, pick-id) and computes its bounds.
//! - [`pick`] packs `(layer, point index)` into the 32-bit per-vertex id and
//!   maps sampled ids back to point indices.
//! - [`highlight`] turns a selected point into fragment-stage uniforms.
//! - [`model`] ties the above to device resources supplied through the
//!   traits in [`device`].

pub mod bounds;
pub mod device;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod highlight;
pub mod model;
pub mod options;
pub mod pick;

pub use self::bounds::Bounds;
pub use self::device::{Camera, ProgramSet, RenderDevice, Uniforms, VertexStreams};
pub use self::error::{GlyphCloudError, Result};
pub use self::geometry::{GeometryBuilder, GlyphGeometry};
pub use self::glyph::{GlyphCatalog, GlyphMesh, GlyphTable, DEFAULT_GLYPH};
pub use self::highlight::HighlightState;
pub use self::model::{ModelResources, RenderModel};
pub use self::options::{Attribute, ModelDefaults, PointCloudOptions};
