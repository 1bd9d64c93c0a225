use glam::{Mat4, Vec3, Vec4};

use crate::ViewportRect;

/// Map a world point to window space: x and y in pixels with the origin at
/// the bottom-left of the viewport, z as depth in `[0, 1]`.
pub fn project(world: Vec3, view: Mat4, projection: Mat4, viewport: ViewportRect) -> Vec3 {
    let clip = projection * view * world.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vec3::new(
        viewport.x as f32 + (ndc.x + 1.0) * 0.5 * viewport.width as f32,
        viewport.y as f32 + (ndc.y + 1.0) * 0.5 * viewport.height as f32,
        (ndc.z + 1.0) * 0.5,
    )
}

/// Inverse of [`project`]. Returns `None` for an empty viewport or when the
/// point maps to infinity.
pub fn unproject(window: Vec3, view: Mat4, projection: Mat4, viewport: ViewportRect) -> Option<Vec3> {
    if viewport.is_empty() {
        return None;
    }
    let inverse = (projection * view).inverse();
    let ndc = Vec4::new(
        (window.x - viewport.x as f32) / viewport.width as f32 * 2.0 - 1.0,
        (window.y - viewport.y as f32) / viewport.height as f32 * 2.0 - 1.0,
        window.z * 2.0 - 1.0,
        1.0,
    );
    let world = inverse * ndc;
    if world.w.abs() <= f32::EPSILON || !world.is_finite() {
        return None;
    }
    Some(world.truncate() / world.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> (Mat4, Mat4, ViewportRect) {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), 1.0, 0.1, 100.0);
        (view, projection, ViewportRect::from_size(800, 800))
    }

    #[test]
    fn origin_lands_in_the_middle() {
        let (view, projection, viewport) = camera();
        let window = project(Vec3::ZERO, view, projection, viewport);
        assert!((window.x - 400.0).abs() < 1e-3);
        assert!((window.y - 400.0).abs() < 1e-3);
        assert!(window.z > 0.0 && window.z < 1.0);
    }

    #[test]
    fn up_in_world_is_up_in_window() {
        let (view, projection, viewport) = camera();
        let window = project(Vec3::Y, view, projection, viewport);
        assert!(window.y > 400.0);
    }

    #[test]
    fn unproject_inverts_project() {
        let (view, projection, viewport) = camera();
        let world = Vec3::new(1.5, -0.75, 2.0);
        let window = project(world, view, projection, viewport);
        let back = unproject(window, view, projection, viewport).unwrap();
        assert!(back.abs_diff_eq(world, 1e-3));
    }

    #[test]
    fn empty_viewport_has_no_inverse() {
        let (view, projection, _) = camera();
        assert!(unproject(Vec3::ZERO, view, projection, ViewportRect::default()).is_none());
    }
}
