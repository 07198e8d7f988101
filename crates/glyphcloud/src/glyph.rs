//! Glyph meshes and the catalog that maps glyph keys to them.
//!
//! A glyph is a small triangulated 2D shape centred on the origin and
//! contained in the unit square `[-0.5, 0.5]²`. Every point of a cloud is
//! drawn as one glyph; the vertex stage offsets each corner by the (scaled)
//! glyph-local coordinate.

use crate::error::{GlyphCloudError, Result};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Key of the glyph used when an update supplies none.
pub const DEFAULT_GLYPH: &str = "●";

/// Segments used to approximate the filled circle.
const CIRCLE_SEGMENTS: u32 = 16;

/// Immutable triangle mesh for one glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMesh {
    positions: Vec<[f32; 2]>,
    cells: Vec<[u32; 3]>,
}

impl GlyphMesh {
    /// Builds a mesh, rejecting cells that index past the position list.
    pub fn new(positions: Vec<[f32; 2]>, cells: Vec<[u32; 3]>) -> Result<Self> {
        for (cell, tri) in cells.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= positions.len()) {
                return Err(GlyphCloudError::InvalidGlyphMesh {
                    cell,
                    index,
                    vertex_count: positions.len(),
                });
            }
        }
        Ok(Self { positions, cells })
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.positions
    }

    #[inline]
    pub fn cells(&self) -> &[[u32; 3]] {
        &self.cells
    }

    /// Number of vertices this glyph expands to in a flat triangle list.
    #[inline]
    pub fn expanded_len(&self) -> usize {
        self.cells.len() * 3
    }

    /// Glyph-local corners of every cell, in emission order.
    pub fn corners(&self) -> impl Iterator<Item = [f32; 2]> + '_ {
        self.cells
            .iter()
            .flat_map(move |c| c.iter().map(move |&k| self.positions[k as usize]))
    }

    /// Triangle fan around the origin through `ring` (counter-clockwise).
    fn fan(ring: Vec<[f32; 2]>) -> Self {
        let n = ring.len() as u32;
        let mut positions = Vec::with_capacity(ring.len() + 1);
        positions.push([0.0, 0.0]);
        positions.extend(ring);
        let cells = (0..n).map(|i| [0, 1 + i, 1 + (i + 1) % n]).collect();
        Self { positions, cells }
    }

    /// Regular polygon with `sides` corners at `radius`, first corner at `phase`.
    fn regular(sides: u32, radius: f32, phase: f32) -> Self {
        let ring = (0..sides)
            .map(|i| {
                let a = phase + TAU * i as f32 / sides as f32;
                [radius * a.cos(), radius * a.sin()]
            })
            .collect();
        Self::fan(ring)
    }

    /// Union of axis-aligned rectangles `[x0, y0, x1, y1]`, two cells each.
    fn rects(rects: &[[f32; 4]]) -> Self {
        let mut positions = Vec::with_capacity(rects.len() * 4);
        let mut cells = Vec::with_capacity(rects.len() * 2);
        for r in rects {
            let base = positions.len() as u32;
            positions.extend([[r[0], r[1]], [r[2], r[1]], [r[2], r[3]], [r[0], r[3]]]);
            cells.push([base, base + 1, base + 2]);
            cells.push([base, base + 2, base + 3]);
        }
        Self { positions, cells }
    }

    fn rotated(mut self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        for p in &mut self.positions {
            *p = [c * p[0] - s * p[1], s * p[0] + c * p[1]];
        }
        self
    }

    fn star(points: u32, outer: f32, inner: f32) -> Self {
        let ring = (0..points * 2)
            .map(|i| {
                let r = if i % 2 == 0 { outer } else { inner };
                let a = FRAC_PI_2 + TAU * i as f32 / (points * 2) as f32;
                [r * a.cos(), r * a.sin()]
            })
            .collect();
        Self::fan(ring)
    }
}

/// Resolves glyph keys to meshes.
pub trait GlyphCatalog {
    /// Looks up `key`, failing with [`GlyphCloudError::GlyphNotFound`].
    fn glyph(&self, key: &str) -> Result<&GlyphMesh>;
}

/// Hash-map backed catalog, pre-populated with the built-in marker shapes.
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    meshes: HashMap<String, GlyphMesh>,
}

impl GlyphTable {
    /// A catalog with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in shapes: ● ■ ▲ ◆ + × ★ ⬢.
    pub fn builtin() -> Self {
        let bar = 0.1;
        let plus = GlyphMesh::rects(&[[-0.5, -bar, 0.5, bar], [-bar, -0.5, bar, -bar], [-bar, bar, bar, 0.5]]);
        let cross = plus.clone().rotated(TAU / 8.0);

        let mut table = Self::empty();
        table.insert(DEFAULT_GLYPH, GlyphMesh::regular(CIRCLE_SEGMENTS, 0.5, 0.0));
        table.insert("■", GlyphMesh::rects(&[[-0.5, -0.5, 0.5, 0.5]]));
        table.insert("▲", GlyphMesh::regular(3, 0.5, FRAC_PI_2));
        table.insert("◆", GlyphMesh::regular(4, 0.5, 0.0));
        table.insert("+", plus);
        table.insert("×", cross);
        table.insert("★", GlyphMesh::star(5, 0.5, 0.2));
        table.insert("⬢", GlyphMesh::regular(6, 0.5, FRAC_PI_2));
        table
    }

    /// Registers (or replaces) a glyph.
    pub fn insert(&mut self, key: impl Into<String>, mesh: GlyphMesh) -> Option<GlyphMesh> {
        self.meshes.insert(key.into(), mesh)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl GlyphCatalog for GlyphTable {
    fn glyph(&self, key: &str) -> Result<&GlyphMesh> {
        self.meshes
            .get(key)
            .ok_or_else(|| GlyphCloudError::GlyphNotFound(key.to_owned()))
    }
}
