//! Whole-assembly and picked-cube manipulation driven by pointer and arrow input.

use glam::{Mat4, Vec3};
use tracing::trace;

use crate::{CubeAssembly, CubeError, CubeId, CubeResult};

/// Orbit pitch per gesture is clamped to this many degrees either way.
pub const MAX_ORBIT_PITCH_DEG: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Translation applied to the assembly for one arrow press of size `step`.
    pub fn offset(self, step: f32) -> Vec3 {
        match self {
            PanDirection::Up => Vec3::new(0.0, -step, 0.0),
            PanDirection::Down => Vec3::new(0.0, step, 0.0),
            PanDirection::Right => Vec3::new(-step, 0.0, 0.0),
            PanDirection::Left => Vec3::new(step, 0.0, 0.0),
        }
    }
}

fn yaw_pitch(yaw_deg: f32, pitch_deg: f32) -> Mat4 {
    let pitch = pitch_deg.clamp(-MAX_ORBIT_PITCH_DEG, MAX_ORBIT_PITCH_DEG);
    Mat4::from_rotation_y(yaw_deg.to_radians()) * Mat4::from_rotation_x(pitch.to_radians())
}

impl CubeAssembly {
    /// Shift every placement, center included.
    pub fn pan(&mut self, direction: PanDirection, step: f32) {
        let shift = Mat4::from_translation(direction.offset(step));
        for cube in self.cubes_mut() {
            cube.apply_placement(shift);
        }
        trace!(?direction, step, "Panned assembly");
    }

    /// Compose a yaw/pitch onto every cube's free rotation.
    pub fn orbit(&mut self, yaw_deg: f32, pitch_deg: f32) {
        let rotation = yaw_pitch(yaw_deg, pitch_deg);
        for cube in self.cubes_mut() {
            cube.apply_free_rotation(rotation);
        }
    }

    /// Free rotation shared by every cube.
    pub fn free_rotation(&self) -> Mat4 {
        self.center().free_rotation()
    }

    /// Rotate the selected cube about its own position.
    pub fn rotate_selected(&mut self, yaw_deg: f32, pitch_deg: f32) -> CubeResult<CubeId> {
        let id = self.selected().ok_or(CubeError::NothingSelected)?;
        let pivot = self.cube(id).position();
        let transform =
            Mat4::from_translation(pivot) * yaw_pitch(yaw_deg, pitch_deg) * Mat4::from_translation(-pivot);
        self.cube_mut(id).apply_placement(transform);
        Ok(id)
    }

    /// Translate the selected cube by `delta` in assembly space.
    pub fn translate_selected(&mut self, delta: Vec3) -> CubeResult<CubeId> {
        let id = self.selected().ok_or(CubeError::NothingSelected)?;
        self.cube_mut(id).apply_placement(Mat4::from_translation(delta));
        Ok(id)
    }

    /// Translate the selected cube by a delta measured in world space, i.e.
    /// after the free rotation has been applied.
    pub fn translate_selected_world(&mut self, world_delta: Vec3) -> CubeResult<CubeId> {
        let id = self.selected().ok_or(CubeError::NothingSelected)?;
        let local = self
            .cube(id)
            .free_rotation()
            .inverse()
            .transform_vector3(world_delta);
        self.translate_selected(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Wall, CENTER_ID};

    #[test]
    fn arrow_pan_moves_opposite_to_the_key() {
        let mut assembly = CubeAssembly::new();
        assembly.pan(PanDirection::Up, 1.0);
        assembly.pan(PanDirection::Right, 0.5);
        assert_eq!(assembly.position(), Vec3::new(-0.5, -1.0, 0.0));
        assembly.pan(PanDirection::Down, 1.0);
        assembly.pan(PanDirection::Left, 0.5);
        assert_eq!(assembly.position(), Vec3::ZERO);
    }

    #[test]
    fn orbit_leaves_placements_alone() {
        let mut assembly = CubeAssembly::new();
        let before: Vec<Mat4> = assembly.cubes().iter().map(|c| c.placement()).collect();
        assembly.orbit(30.0, 500.0);
        for (cube, placement) in assembly.cubes().iter().zip(before) {
            assert_eq!(cube.placement(), placement);
            assert_eq!(cube.free_rotation(), assembly.free_rotation());
        }
        let expected = Mat4::from_rotation_y(30f32.to_radians())
            * Mat4::from_rotation_x(MAX_ORBIT_PITCH_DEG.to_radians());
        assert!(assembly.free_rotation().abs_diff_eq(expected, 1e-6));
        assert_eq!(assembly.wall_members(Wall::Right).len(), 9);
    }

    #[test]
    fn selected_cube_rotates_in_place() {
        let mut assembly = CubeAssembly::new();
        assert_eq!(assembly.rotate_selected(10.0, 0.0), Err(CubeError::NothingSelected));

        let corner = CubeId::new(26).unwrap();
        assembly.set_picking_mode(true);
        assembly.select(Some(corner));
        assert_eq!(assembly.rotate_selected(45.0, 20.0), Ok(corner));
        assert!(assembly.cube(corner).position().abs_diff_eq(Vec3::ONE, 1e-5));
        assert_ne!(assembly.cube(corner).placement(), Mat4::from_translation(Vec3::ONE));
    }

    #[test]
    fn world_translation_undoes_the_orbit() {
        let mut assembly = CubeAssembly::new();
        assembly.orbit(90.0, 0.0);
        assembly.select(Some(CENTER_ID));
        assembly.translate_selected_world(Vec3::X).unwrap();

        let moved = assembly.cube(CENTER_ID);
        let world = moved.model_matrix().transform_point3(Vec3::ZERO);
        assert!(world.abs_diff_eq(Vec3::X, 1e-5));
        assert!(moved.position().abs_diff_eq(Vec3::Z, 1e-5));
    }
}
