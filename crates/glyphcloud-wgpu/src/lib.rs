//! Headless wgpu backend for glyphcloud.
//!
//! Renders glyph point clouds into offscreen RGBA8 targets: a color target
//! for the shaded draw pass and a pick target whose texels hold the raw
//! pick-id bytes, read back one texel at a time.

pub mod context;
pub mod pipelines;
pub mod renderer;
pub mod resources;
pub mod targets;
pub mod uniforms;

pub use self::renderer::HeadlessRenderer;
pub use self::resources::Wgpu;
