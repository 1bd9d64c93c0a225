use glam::Vec3;
use tracing::{debug, info};

use crate::{
    CubeId, CubeResult, FaceLocks, FaceRotationEngine, RigidSubCube, RotationDirection,
    RotationReport, StepAngle, Wall, CENTER_ID, CUBE_COUNT,
};

/// Build the 27 sub-cubes, iterating x, y, z over `-1..=1` with x outermost.
///
/// Identity `i` always lands on the same grid position, which the picking
/// colours rely on.
pub fn generate_small_cubes() -> [RigidSubCube; CUBE_COUNT] {
    std::array::from_fn(|index| RigidSubCube::new(CubeId::from_index(index)))
}

/// The whole puzzle: 27 sub-cubes, turn parameters and picking state.
///
/// Created once per session. The center and the selection are stored as
/// identities into the fixed array, never as second owners.
#[derive(Debug, Clone)]
pub struct CubeAssembly {
    cubes: [RigidSubCube; CUBE_COUNT],
    engine: FaceRotationEngine,
    picking_mode: bool,
    selected: Option<CubeId>,
}

impl Default for CubeAssembly {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeAssembly {
    pub fn new() -> Self {
        Self {
            cubes: generate_small_cubes(),
            engine: FaceRotationEngine::new(),
            picking_mode: false,
            selected: None,
        }
    }

    pub fn cubes(&self) -> &[RigidSubCube] {
        &self.cubes
    }

    pub fn cube(&self, id: CubeId) -> &RigidSubCube {
        &self.cubes[id.index()]
    }

    pub(crate) fn cube_mut(&mut self, id: CubeId) -> &mut RigidSubCube {
        &mut self.cubes[id.index()]
    }

    pub(crate) fn cubes_mut(&mut self) -> &mut [RigidSubCube] {
        &mut self.cubes
    }

    pub fn center(&self) -> &RigidSubCube {
        self.cube(CENTER_ID)
    }

    /// Logical position of the assembly: the center cube's live position.
    pub fn position(&self) -> Vec3 {
        self.center().position()
    }

    /// Cubes currently in `wall`, derived from live positions.
    pub fn wall_members(&self, wall: Wall) -> Vec<CubeId> {
        let center = self.position();
        self.cubes
            .iter()
            .filter(|cube| wall.contains(center, cube.position()))
            .map(RigidSubCube::id)
            .collect()
    }

    pub fn rotation_direction(&self) -> RotationDirection {
        self.engine.direction()
    }

    pub fn rotation_angle(&self) -> StepAngle {
        self.engine.angle()
    }

    pub fn signed_angle(&self) -> i32 {
        self.engine.signed_degrees()
    }

    pub fn face_locks(&self) -> &FaceLocks {
        self.engine.locks()
    }

    pub fn is_mid_turn(&self, wall: Wall) -> bool {
        self.engine.locks().is_set(wall)
    }

    pub fn flip_rotation_direction(&mut self) -> RotationDirection {
        let direction = self.engine.flip_direction();
        info!("Rotation direction is now {direction:?}");
        direction
    }

    pub fn halve_rotation_angle(&mut self) -> StepAngle {
        let angle = self.engine.halve_angle();
        info!("New rotation angle: {}", self.signed_angle());
        angle
    }

    pub fn double_rotation_angle(&mut self) -> StepAngle {
        let angle = self.engine.double_angle();
        info!("New rotation angle: {}", self.signed_angle());
        angle
    }

    pub fn can_rotate(&self, wall: Wall) -> bool {
        self.engine.can_rotate(wall)
    }

    /// Turn `wall` without consulting the locks.
    pub fn rotate_wall(&mut self, wall: Wall) -> RotationReport {
        let center = self.position();
        self.engine.rotate(&mut self.cubes, center, wall)
    }

    /// Turn `wall` if no wall on another axis is mid-turn; otherwise leave
    /// every transform untouched and report which wall is in the way.
    pub fn try_rotate_wall(&mut self, wall: Wall) -> CubeResult<RotationReport> {
        self.engine.check(wall)?;
        Ok(self.rotate_wall(wall))
    }

    pub fn can_rotate_right_wall(&self) -> bool {
        self.can_rotate(Wall::Right)
    }

    pub fn can_rotate_left_wall(&self) -> bool {
        self.can_rotate(Wall::Left)
    }

    pub fn can_rotate_up_wall(&self) -> bool {
        self.can_rotate(Wall::Up)
    }

    pub fn can_rotate_down_wall(&self) -> bool {
        self.can_rotate(Wall::Down)
    }

    pub fn can_rotate_back_wall(&self) -> bool {
        self.can_rotate(Wall::Back)
    }

    pub fn can_rotate_front_wall(&self) -> bool {
        self.can_rotate(Wall::Front)
    }

    pub fn rotate_right_wall(&mut self) -> RotationReport {
        self.rotate_wall(Wall::Right)
    }

    pub fn rotate_left_wall(&mut self) -> RotationReport {
        self.rotate_wall(Wall::Left)
    }

    pub fn rotate_up_wall(&mut self) -> RotationReport {
        self.rotate_wall(Wall::Up)
    }

    pub fn rotate_down_wall(&mut self) -> RotationReport {
        self.rotate_wall(Wall::Down)
    }

    pub fn rotate_back_wall(&mut self) -> RotationReport {
        self.rotate_wall(Wall::Back)
    }

    pub fn rotate_front_wall(&mut self) -> RotationReport {
        self.rotate_wall(Wall::Front)
    }

    pub fn picking_mode(&self) -> bool {
        self.picking_mode
    }

    /// Leaving picking mode drops the current selection.
    pub fn set_picking_mode(&mut self, enabled: bool) {
        self.picking_mode = enabled;
        if !enabled {
            self.selected = None;
        }
        info!("Picking mode is now: {enabled}");
    }

    pub fn toggle_picking_mode(&mut self) -> bool {
        self.set_picking_mode(!self.picking_mode);
        self.picking_mode
    }

    pub fn selected(&self) -> Option<CubeId> {
        self.selected
    }

    pub fn selected_cube(&self) -> Option<&RigidSubCube> {
        self.selected.map(|id| self.cube(id))
    }

    /// Record a pick result. `None` is a miss and clears the selection.
    pub fn select(&mut self, id: Option<CubeId>) {
        match id {
            Some(id) => debug!("Selected cube index: {}", id.get()),
            None => debug!("Pick missed, selection cleared"),
        }
        self.selected = id;
    }
}
