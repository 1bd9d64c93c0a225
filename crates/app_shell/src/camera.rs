use cube_render::{FrameMatrices, ViewportRect};
use glam::{Mat4, Vec2, Vec3};
use settings::CameraSettings;

const WORLD_UP: Vec3 = Vec3::Y;

/// Free-flying perspective camera that looks at the cube from +Z.
#[derive(Debug, Clone)]
pub struct CameraController {
    position: Vec3,
    /// Unit view direction
    forward: Vec3,
    up: Vec3,

    fov_y_deg: f32,
    near: f32,
    far: f32,

    viewport_size: (u32, u32),
}

impl CameraController {
    pub fn new(settings: &CameraSettings, initial_viewport: (u32, u32)) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, settings.initial_distance),
            forward: Vec3::NEG_Z,
            up: WORLD_UP,
            fov_y_deg: settings.fov_degrees,
            near: settings.near,
            far: settings.far,
            viewport_size: initial_viewport,
        }
    }

    pub fn update_viewport(&mut self, size: (u32, u32)) {
        self.viewport_size = size;
    }

    pub fn viewport(&self) -> ViewportRect {
        ViewportRect::from_size(self.viewport_size.0, self.viewport_size.1)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    /// Move along the camera's right and up vectors. `delta` is the cursor
    /// travel in pixels, previous minus current.
    pub fn pan(&mut self, delta: Vec2, settings: &CameraSettings) {
        let right = self.right();
        self.position += right * delta.x * settings.pan_sensitivity;
        self.position += self.up * delta.y * settings.pan_sensitivity;
    }

    /// Dolly along the view direction, keeping the distance to the origin
    /// within the configured limits.
    pub fn zoom(&mut self, amount: f32, settings: &CameraSettings) {
        let moved = self.position + self.forward * amount * settings.zoom_step;
        let distance = moved.length();
        if (settings.min_distance..=settings.max_distance).contains(&distance) {
            self.position = moved;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = self.viewport().aspect();
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), aspect.max(0.001), self.near, self.far)
    }

    pub fn matrices(&self) -> FrameMatrices {
        FrameMatrices {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_positive_z_axis() {
        let settings = CameraSettings::default();
        let camera = CameraController::new(&settings, (800, 800));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 10.0));
        let eye_space = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(eye_space.abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), 1e-5));
    }

    #[test]
    fn pan_follows_right_and_up() {
        let settings = CameraSettings::default();
        let mut camera = CameraController::new(&settings, (800, 800));
        camera.pan(Vec2::new(200.0, -100.0), &settings);
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(1.0, -0.5, 10.0), 1e-5));
    }

    #[test]
    fn zoom_is_clamped() {
        let settings = CameraSettings::default();
        let mut camera = CameraController::new(&settings, (800, 800));
        camera.zoom(2.0, &settings);
        assert!((camera.position().z - 9.0).abs() < 1e-5);
        for _ in 0..100 {
            camera.zoom(1.0, &settings);
        }
        assert!(camera.position().z >= settings.min_distance);
        for _ in 0..1000 {
            camera.zoom(-1.0, &settings);
        }
        assert!(camera.position().z <= settings.max_distance);
    }
}
