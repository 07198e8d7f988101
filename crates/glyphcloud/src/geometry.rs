//! Expansion of a point set into flat, non-indexed glyph triangles.
//!
//! For point `i` and every triangle of its glyph, three vertices are emitted
//! that all share the point's world position, color and pick-id; only the
//! glyph-local offset differs per corner. The vertex stage applies the offset
//! after projection, so world positions stay untouched here.

use crate::bounds::Bounds;
use crate::error::{GlyphCloudError, Result};
use crate::glyph::{GlyphCatalog, GlyphMesh};
use crate::options::{Attribute, ModelDefaults, PointCloudOptions};
use crate::pick;

/// Four parallel vertex streams plus the bounds of the source points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphGeometry {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub glyph_offsets: Vec<[f32; 2]>,
    pub pick_ids: Vec<u32>,
    pub bounds: Bounds,
    pub point_count: usize,
}

impl GlyphGeometry {
    /// Emitted vertices; always a multiple of three.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    #[inline]
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    #[inline]
    pub fn flat_glyph_offsets(&self) -> &[f32] {
        bytemuck::cast_slice(&self.glyph_offsets)
    }

    fn with_capacity(vertices: usize, point_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            glyph_offsets: Vec::with_capacity(vertices),
            pick_ids: Vec::with_capacity(vertices),
            bounds: Bounds::EMPTY,
            point_count,
        }
    }
}

/// Resolves per-point attributes against a glyph catalog and defaults.
pub struct GeometryBuilder<'a, C: GlyphCatalog + ?Sized> {
    catalog: &'a C,
    defaults: &'a ModelDefaults,
}

impl<'a, C: GlyphCatalog + ?Sized> GeometryBuilder<'a, C> {
    pub fn new(catalog: &'a C, defaults: &'a ModelDefaults) -> Self {
        Self { catalog, defaults }
    }

    /// Expands `options` into glyph geometry tagged with pick `layer`.
    ///
    /// All validation (positions present, attribute lengths, glyph lookups)
    /// happens before the first vertex is written.
    pub fn build(&self, options: &PointCloudOptions, layer: u8) -> Result<GlyphGeometry> {
        let points = options
            .position
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(GlyphCloudError::MissingPositions)?;
        let n = points.len();

        if let Some(color) = &options.color {
            color.check_len("color", n)?;
        }
        if let Some(size) = &options.size {
            size.check_len("size", n)?;
        }
        if let Some(glyph) = &options.glyph {
            glyph.check_len("glyph", n)?;
        }

        let meshes = self.resolve_glyphs(options, n)?;
        let vertices = meshes.iter().map(|m| m.expanded_len()).sum();
        let mut out = GlyphGeometry::with_capacity(vertices, n);

        for (i, (&x, mesh)) in points.iter().zip(&meshes).enumerate() {
            let color = options
                .color
                .as_ref()
                .map_or(self.defaults.color, |c| *c.get(i));
            let size = options
                .size
                .as_ref()
                .map_or(self.defaults.size, |s| *s.get(i));
            let id = pick::encode(layer, i as u32);

            out.bounds.include(x);

            for corner in mesh.corners() {
                out.positions.push(x);
                out.colors.push(color);
                out.glyph_offsets.push([size * corner[0], size * corner[1]]);
                out.pick_ids.push(id);
            }
        }

        log::debug!(
            "glyph geometry: points={}, vertices={}, layer={}, bounds=min({:?}) max({:?})",
            n,
            out.vertex_count(),
            layer,
            out.bounds.lower,
            out.bounds.upper
        );

        Ok(out)
    }

    fn resolve_glyphs(&self, options: &PointCloudOptions, n: usize) -> Result<Vec<&'a GlyphMesh>> {
        match &options.glyph {
            Some(Attribute::PerPoint(keys)) => {
                keys.iter().map(|k| self.catalog.glyph(k)).collect()
            }
            Some(Attribute::Uniform(key)) => Ok(vec![self.catalog.glyph(key)?; n]),
            None => Ok(vec![self.catalog.glyph(&self.defaults.glyph)?; n]),
        }
    }
}
