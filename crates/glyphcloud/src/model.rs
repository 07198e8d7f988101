//! `RenderModel`: one glyph point cloud bound to device resources.

use crate::bounds::Bounds;
use crate::device::{
    BufferData, Camera, Pass, ProgramSet, RenderDevice, ShaderProgram, Uniforms, VertexArray,
    VertexBuffer, VertexStreams,
};
use crate::error::Result;
use crate::geometry::GeometryBuilder;
use crate::glyph::GlyphCatalog;
use crate::highlight::HighlightState;
use crate::options::{ModelDefaults, PointCloudOptions};
use crate::pick;

/// Pre-built device resources a model takes ownership of.
pub struct ModelResources<D: RenderDevice> {
    pub programs: ProgramSet<D::Program>,
    pub streams: VertexStreams<D::Buffer>,
    pub vao: D::VertexArray,
}

/// A renderable, pickable glyph point cloud.
///
/// Not synchronised: updates, draws and pick resolution must all happen on
/// the thread that owns the model.
pub struct RenderModel<D: RenderDevice> {
    programs: ProgramSet<D::Program>,
    streams: VertexStreams<D::Buffer>,
    vao: D::VertexArray,
    defaults: ModelDefaults,

    orthographic: bool,
    pick_layer: u8,
    vertex_count: usize,
    point_count: usize,
    bounds: Bounds,
    highlight: HighlightState,
}

impl<D: RenderDevice> RenderModel<D> {
    /// An empty model (perspective, layer 0, no geometry).
    pub fn new(resources: ModelResources<D>, defaults: ModelDefaults) -> Self {
        Self {
            programs: resources.programs,
            streams: resources.streams,
            vao: resources.vao,
            defaults,
            orthographic: false,
            pick_layer: 0,
            vertex_count: 0,
            point_count: 0,
            bounds: Bounds::EMPTY,
            highlight: HighlightState::NONE,
        }
    }

    /// Creates a model and uploads its first point set.
    pub fn create<C: GlyphCatalog + ?Sized>(
        resources: ModelResources<D>,
        defaults: ModelDefaults,
        catalog: &C,
        options: &PointCloudOptions,
    ) -> Result<Self> {
        let mut model = Self::new(resources, defaults);
        model.update(catalog, options)?;
        Ok(model)
    }

    /// Rebuilds all glyph geometry and replaces the device buffers.
    ///
    /// On error nothing changes: geometry is built completely before any
    /// buffer or flag is touched.
    pub fn update<C: GlyphCatalog + ?Sized>(
        &mut self,
        catalog: &C,
        options: &PointCloudOptions,
    ) -> Result<()> {
        let layer = options.pick_id.unwrap_or(self.pick_layer);
        let geometry = GeometryBuilder::new(catalog, &self.defaults).build(options, layer)?;

        if let Some(ortho) = options.orthographic {
            self.orthographic = ortho;
        }
        self.pick_layer = layer;

        self.streams.position.update(BufferData::F32(geometry.flat_positions()));
        self.streams.color.update(BufferData::F32(geometry.flat_colors()));
        self.streams.glyph.update(BufferData::F32(geometry.flat_glyph_offsets()));
        self.streams.id.update(BufferData::U32(&geometry.pick_ids));

        self.vertex_count = geometry.vertex_count();
        self.point_count = geometry.point_count;
        self.bounds = geometry.bounds;

        log::debug!(
            "render model updated: points={}, vertices={}, layer={}, orthographic={}",
            self.point_count,
            self.vertex_count,
            self.pick_layer,
            self.orthographic
        );
        Ok(())
    }

    /// Draws shaded glyphs, substituting the highlight color on a match.
    pub fn draw(&mut self, camera: &Camera) {
        let uniforms = Uniforms::new(camera, Some(self.highlight));
        self.draw_pass(Pass::Draw, &uniforms);
    }

    /// Draws pick-ids only, for an offscreen pick target.
    pub fn draw_for_picking(&mut self, camera: &Camera) {
        let uniforms = Uniforms::new(camera, None);
        self.draw_pass(Pass::Pick, &uniforms);
    }

    fn draw_pass(&mut self, pass: Pass, uniforms: &Uniforms) {
        let program = self.programs.select_mut(pass, self.orthographic);
        program.bind(uniforms);
        self.vao.draw(program, &self.streams, self.vertex_count as u32);
    }

    /// Maps a sampled pick-id to a point of this model, if it is one.
    pub fn resolve_pick(&self, sampled: u32) -> Option<u32> {
        pick::decode(sampled, self.pick_layer, self.point_count)
    }

    /// Highlights point `index` (or clears the highlight with `None`).
    pub fn set_highlight(&mut self, index: Option<u32>, color: Option<[f32; 3]>) {
        self.highlight = HighlightState::encode(index, self.pick_layer, color);
    }

    /// Releases every device resource the model owns.
    pub fn dispose(self) {
        for program in self.programs.into_array() {
            program.dispose();
        }
        self.vao.dispose();
        let VertexStreams { position, color, glyph, id } = self.streams;
        for buffer in [position, color, glyph, id] {
            buffer.dispose();
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn has_geometry(&self) -> bool {
        self.vertex_count > 0
    }

    pub fn pick_layer(&self) -> u8 {
        self.pick_layer
    }

    pub fn is_orthographic(&self) -> bool {
        self.orthographic
    }

    pub fn highlight(&self) -> HighlightState {
        self.highlight
    }

    pub fn defaults(&self) -> &ModelDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlyphCloudError;
    use crate::glyph::{GlyphMesh, GlyphTable};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecBuffer {
        name: &'static str,
        data: Vec<u8>,
        log: Log,
    }

    impl VertexBuffer for RecBuffer {
        fn update(&mut self, data: BufferData<'_>) {
            self.data = data.as_bytes().to_vec();
            self.log.borrow_mut().push(format!("update {} {}", self.name, data.len()));
        }

        fn dispose(self) {
            self.log.borrow_mut().push(format!("dispose buffer {}", self.name));
        }
    }

    struct RecProgram {
        name: &'static str,
        bound: Option<Uniforms>,
        log: Log,
    }

    impl ShaderProgram for RecProgram {
        fn bind(&mut self, uniforms: &Uniforms) {
            self.bound = Some(*uniforms);
            self.log.borrow_mut().push(format!("bind {}", self.name));
        }

        fn dispose(self) {
            self.log.borrow_mut().push(format!("dispose program {}", self.name));
        }
    }

    struct RecVao {
        log: Log,
        last_uniforms: Option<Uniforms>,
    }

    impl VertexArray<RecBuffer, RecProgram> for RecVao {
        fn draw(&mut self, program: &RecProgram, streams: &VertexStreams<RecBuffer>, count: u32) {
            assert_eq!(streams.position.data.len(), count as usize * 12);
            self.last_uniforms = program.bound;
            self.log.borrow_mut().push(format!("draw {} {}", program.name, count));
        }

        fn dispose(self) {
            self.log.borrow_mut().push("dispose vao".into());
        }
    }

    struct Rec;

    impl RenderDevice for Rec {
        type Buffer = RecBuffer;
        type Program = RecProgram;
        type VertexArray = RecVao;
    }

    fn model() -> (RenderModel<Rec>, Log) {
        let log: Log = Rc::default();
        let buffer = |name: &'static str| RecBuffer { name, data: Vec::new(), log: log.clone() };
        let program = |name: &'static str| RecProgram { name, bound: None, log: log.clone() };
        let resources = ModelResources::<Rec> {
            programs: ProgramSet {
                perspective: program("perspective"),
                orthographic: program("orthographic"),
                pick_perspective: program("pick_perspective"),
                pick_orthographic: program("pick_orthographic"),
            },
            streams: VertexStreams {
                position: buffer("position"),
                color: buffer("color"),
                glyph: buffer("glyph"),
                id: buffer("id"),
            },
            vao: RecVao { log: log.clone(), last_uniforms: None },
        };
        (RenderModel::new(resources, ModelDefaults::default()), log)
    }

    fn catalog() -> GlyphTable {
        let mut table = GlyphTable::builtin();
        table.insert(
            "tri",
            GlyphMesh::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], vec![[0, 1, 2]]).unwrap(),
        );
        table
    }

    fn three_points() -> PointCloudOptions {
        PointCloudOptions::new(vec![[0.0, 0.0, 0.0], [5.0, -2.0, 9.0], [1.0, 1.0, 1.0]])
            .with_glyph("tri")
    }

    #[test]
    fn test_update_replaces_buffers() {
        let (mut m, log) = model();
        m.update(&catalog(), &three_points()).unwrap();

        assert_eq!(m.vertex_count(), 9);
        assert_eq!(m.point_count(), 3);
        assert!(m.has_geometry());
        assert_eq!(m.bounds(), Bounds { lower: [0.0, -2.0, 0.0], upper: [5.0, 1.0, 9.0] });
        assert_eq!(
            *log.borrow(),
            vec!["update position 27", "update color 27", "update glyph 18", "update id 9"]
        );
        assert_eq!(m.streams.id.data.len(), 9 * 4);
    }

    #[test]
    fn test_failed_update_keeps_state() {
        let (mut m, log) = model();
        m.update(&catalog(), &three_points().with_pick_id(4).with_orthographic(true))
            .unwrap();
        log.borrow_mut().clear();

        let missing = PointCloudOptions { pick_id: Some(9), ..Default::default() };
        assert_eq!(m.update(&catalog(), &missing), Err(GlyphCloudError::MissingPositions));

        let unknown = three_points().with_glyph("nope").with_orthographic(false);
        assert!(m.update(&catalog(), &unknown).is_err());

        assert_eq!(m.vertex_count(), 9);
        assert_eq!(m.point_count(), 3);
        assert_eq!(m.pick_layer(), 4);
        assert!(m.is_orthographic());
        assert_eq!(m.bounds().upper, [5.0, 1.0, 9.0]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_layer_and_projection_are_sticky() {
        let (mut m, _) = model();
        m.update(&catalog(), &three_points().with_pick_id(7).with_orthographic(true))
            .unwrap();
        m.update(&catalog(), &PointCloudOptions::new(vec![[2.0; 3]])).unwrap();

        assert_eq!(m.pick_layer(), 7);
        assert!(m.is_orthographic());
        assert_eq!(m.resolve_pick(pick::encode(7, 0)), Some(0));
    }

    #[test]
    fn test_resolve_pick() {
        let (mut m, _) = model();
        m.update(&catalog(), &three_points().with_pick_id(2)).unwrap();

        assert_eq!(m.resolve_pick(pick::encode(2, 1)), Some(1));
        assert_eq!(m.resolve_pick(pick::encode(3, 1)), None);
        assert_eq!(m.resolve_pick(pick::encode(2, 3)), None);

        // Shrinking the point set invalidates ids of removed points.
        m.update(&catalog(), &PointCloudOptions::new(vec![[0.0; 3]])).unwrap();
        assert_eq!(m.resolve_pick(pick::encode(2, 1)), None);
        assert_eq!(m.resolve_pick(pick::encode(2, 0)), Some(0));
    }

    #[test]
    fn test_highlight() {
        let (mut m, _) = model();
        m.update(&catalog(), &three_points().with_pick_id(7)).unwrap();
        assert!(m.highlight().is_none());

        m.set_highlight(Some(5), Some([1.0, 0.0, 0.0]));
        assert_eq!(m.highlight().id, [5.0 / 255.0, 0.0, 0.0, 7.0 / 255.0]);
        assert_eq!(m.highlight().color, [1.0, 0.0, 0.0]);

        m.set_highlight(None, None);
        assert_eq!(m.highlight(), HighlightState::NONE);
    }

    #[test]
    fn test_draw_selects_program_and_uniforms() {
        let (mut m, log) = model();
        m.update(&catalog(), &three_points()).unwrap();
        m.set_highlight(Some(1), Some([0.0, 1.0, 0.0]));
        log.borrow_mut().clear();

        m.draw(&Camera::default());
        let drawn = m.vao.last_uniforms.unwrap();
        assert_eq!(drawn.highlight, Some(m.highlight()));
        assert_eq!(drawn.model, glam::Mat4::IDENTITY);

        m.draw_for_picking(&Camera::default());
        assert_eq!(m.vao.last_uniforms.unwrap().highlight, None);

        m.update(&catalog(), &three_points().with_orthographic(true)).unwrap();
        log.borrow_mut().clear();
        m.draw(&Camera::default());
        m.draw_for_picking(&Camera::default());

        assert_eq!(
            *log.borrow(),
            vec!["bind orthographic", "draw orthographic 9", "bind pick_orthographic", "draw pick_orthographic 9"]
        );
    }

    #[test]
    fn test_create_requires_positions() {
        let (m, _) = model();
        let resources = ModelResources::<Rec> { programs: m.programs, streams: m.streams, vao: m.vao };
        let err = RenderModel::create(resources, ModelDefaults::default(), &catalog(), &PointCloudOptions::default());
        assert!(matches!(err, Err(GlyphCloudError::MissingPositions)));
    }

    #[test]
    fn test_dispose_releases_everything_once() {
        let (m, log) = model();
        m.dispose();
        let log = log.borrow();
        assert_eq!(log.len(), 9);
        assert_eq!(log.iter().filter(|l| l.starts_with("dispose program")).count(), 4);
        assert_eq!(log.iter().filter(|l| l.starts_with("dispose buffer")).count(), 4);
        assert!(log.contains(&"dispose vao".to_owned()));
    }
}
