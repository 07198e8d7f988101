//! Framing a point set for headless rendering.

use glam::{Mat4, Vec3};
use glyphcloud::{Bounds, Camera};

/// Padding around the framed bounds.
const MARGIN: f32 = 1.1;

/// Smallest half-height of the view volume, so single points stay framed.
const MIN_HALF_EXTENT: f32 = 1.0;

/// Orthographic camera looking down -Z at the centre of `bounds`, with the
/// larger of the X/Y extents filling the viewport.
pub fn fit_bounds(bounds: &Bounds, viewport: [u32; 2]) -> Camera {
    let (Some(center), Some(extent)) = (bounds.center(), bounds.extent()) else {
        return Camera { viewport, ..Camera::default() };
    };

    let aspect = viewport[0].max(1) as f32 / viewport[1].max(1) as f32;
    let half = (extent.x.max(extent.y) * 0.5 * MARGIN).max(MIN_HALF_EXTENT);
    let (hw, hh) = if aspect >= 1.0 { (half * aspect, half) } else { (half, half / aspect) };
    let depth = extent.z * 0.5 + 1.0;

    Camera {
        model: None,
        view: Some(Mat4::look_at_rh(center + Vec3::Z * depth, center, Vec3::Y)),
        projection: Some(Mat4::orthographic_rh(-hw, hw, -hh, hh, 0.0, 2.0 * depth)),
        viewport,
    }
}

/// Pixel (from the top-left corner) a world position lands on.
pub fn project_to_pixel(camera: &Camera, p: [f32; 3]) -> Option<[u32; 2]> {
    let m = camera.projection.unwrap_or(Mat4::IDENTITY)
        * camera.view.unwrap_or(Mat4::IDENTITY)
        * camera.model.unwrap_or(Mat4::IDENTITY);
    let ndc = m.project_point3(Vec3::from(p));
    if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) {
        return None;
    }
    let [w, h] = camera.viewport;
    let x = ((ndc.x + 1.0) * 0.5 * w as f32).min(w as f32 - 1.0);
    let y = ((1.0 - ndc.y) * 0.5 * h as f32).min(h as f32 - 1.0);
    Some([x as u32, y as u32])
}
