use std::fmt;

use glam::{IVec3, Mat4, Vec3};

/// Number of sub-cubes in a 3x3x3 assembly.
pub const CUBE_COUNT: usize = 27;

/// Identity of the structural center cube (grid position `(0, 0, 0)`).
pub const CENTER_ID: CubeId = CubeId(13);

/// Identity of a sub-cube, always in `0..CUBE_COUNT`.
///
/// Used as the non-owning handle for the center and the picked cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeId(u8);

impl CubeId {
    pub const fn new(raw: u8) -> Option<Self> {
        if (raw as usize) < CUBE_COUNT {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Callers guarantee `index < CUBE_COUNT`.
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = CubeId> {
        (0..CUBE_COUNT as u8).map(CubeId)
    }

    /// Grid coordinate this identity is generated at (x outer, z inner).
    pub const fn grid_position(self) -> IVec3 {
        let raw = self.0 as i32;
        IVec3::new(raw / 9 - 1, (raw / 3) % 3 - 1, raw % 3 - 1)
    }
}

impl fmt::Display for CubeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One unit cube of the assembly.
///
/// `placement` holds everything face turns, picked-cube drags and pans have
/// done to this cube. `free_rotation` holds the whole-assembly orbit and is
/// only composed on top at render time, so positions read back from
/// `placement` stay on the cube's own grid.
#[derive(Debug, Clone)]
pub struct RigidSubCube {
    id: CubeId,
    placement: Mat4,
    free_rotation: Mat4,
}

impl RigidSubCube {
    pub(crate) fn new(id: CubeId) -> Self {
        Self {
            id,
            placement: Mat4::from_translation(id.grid_position().as_vec3()),
            free_rotation: Mat4::IDENTITY,
        }
    }

    pub fn id(&self) -> CubeId {
        self.id
    }

    /// Current position in assembly space, read from the placement translation.
    pub fn position(&self) -> Vec3 {
        self.placement.w_axis.truncate()
    }

    pub fn placement(&self) -> Mat4 {
        self.placement
    }

    pub fn free_rotation(&self) -> Mat4 {
        self.free_rotation
    }

    /// Model matrix handed to the renderer.
    pub fn model_matrix(&self) -> Mat4 {
        self.free_rotation * self.placement
    }

    /// Left-multiply `transform` onto the placement (`new = transform * old`).
    pub(crate) fn apply_placement(&mut self, transform: Mat4) {
        self.placement = transform * self.placement;
    }

    pub(crate) fn apply_free_rotation(&mut self, rotation: Mat4) {
        self.free_rotation = rotation * self.free_rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_range_is_checked() {
        assert_eq!(CubeId::new(26).map(CubeId::get), Some(26));
        assert!(CubeId::new(27).is_none());
        assert_eq!(CubeId::all().count(), CUBE_COUNT);
    }

    #[test]
    fn center_sits_at_origin() {
        assert_eq!(CENTER_ID.grid_position(), IVec3::ZERO);
        assert_eq!(RigidSubCube::new(CENTER_ID).position(), Vec3::ZERO);
    }

    #[test]
    fn placement_composes_on_the_left() {
        let id = CubeId::new(0).unwrap();
        let mut cube = RigidSubCube::new(id);
        assert_eq!(cube.position(), Vec3::new(-1.0, -1.0, -1.0));

        cube.apply_placement(Mat4::from_translation(Vec3::X * 2.0));
        cube.apply_placement(Mat4::from_scale(Vec3::splat(2.0)));
        assert_eq!(cube.position(), Vec3::new(2.0, -2.0, -2.0));
    }

    #[test]
    fn free_rotation_does_not_move_the_placement() {
        let mut cube = RigidSubCube::new(CubeId::new(26).unwrap());
        cube.apply_free_rotation(Mat4::from_rotation_y(1.0));
        assert_eq!(cube.position(), Vec3::ONE);
        assert_ne!(cube.model_matrix(), cube.placement());
    }
}
