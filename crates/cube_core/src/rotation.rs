use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::{CubeError, CubeId, CubeResult, RigidSubCube, Wall};

/// Sign applied to every wall turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub const fn sign(self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Magnitude of one wall turn in whole degrees, kept within `[MIN, MAX]`.
///
/// Halving and doubling are the only ways to change it, so the value is
/// always one of 45, 90 or 180.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepAngle(u16);

impl StepAngle {
    pub const MIN: StepAngle = StepAngle(45);
    pub const MAX: StepAngle = StepAngle(180);
    pub const DEFAULT: StepAngle = StepAngle(90);

    pub const fn degrees(self) -> u16 {
        self.0
    }

    pub fn halved(self) -> Self {
        Self((self.0 / 2).max(Self::MIN.0))
    }

    pub fn doubled(self) -> Self {
        Self((self.0 * 2).min(Self::MAX.0))
    }

    /// The smallest step leaves a wall halfway between two stable positions.
    pub fn is_half_turn(self) -> bool {
        self == Self::MIN
    }
}

impl Default for StepAngle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One "mid-turn" flag per wall.
///
/// A flag flips every time its wall is turned by the 45° step, so it is set
/// while the wall sits between two stable positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceLocks([bool; 6]);

impl FaceLocks {
    pub fn is_set(&self, wall: Wall) -> bool {
        self.0[wall.index()]
    }

    pub fn toggle(&mut self, wall: Wall) -> bool {
        let flag = &mut self.0[wall.index()];
        *flag = !*flag;
        *flag
    }

    /// First wall on a different axis that is currently mid-turn.
    pub fn blocking(&self, wall: Wall) -> Option<Wall> {
        Wall::ALL
            .into_iter()
            .find(|other| !other.shares_axis_with(wall) && self.is_set(*other))
    }

    pub fn can_rotate(&self, wall: Wall) -> bool {
        self.blocking(wall).is_none()
    }
}

/// What a single wall turn did.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationReport {
    pub wall: Wall,
    pub signed_degrees: i32,
    pub moved: Vec<CubeId>,
    /// New state of the wall's mid-turn flag, if this turn flipped it.
    pub lock_toggled: Option<bool>,
}

/// Turns walls about the center cube and tracks the turn parameters.
#[derive(Debug, Clone, Default)]
pub struct FaceRotationEngine {
    direction: RotationDirection,
    angle: StepAngle,
    locks: FaceLocks,
}

impl FaceRotationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    pub fn angle(&self) -> StepAngle {
        self.angle
    }

    pub fn locks(&self) -> &FaceLocks {
        &self.locks
    }

    /// Angle applied to the next turn, direction included.
    pub fn signed_degrees(&self) -> i32 {
        i32::from(self.angle.degrees()) * self.direction.sign()
    }

    pub fn flip_direction(&mut self) -> RotationDirection {
        self.direction = self.direction.flipped();
        self.direction
    }

    pub fn halve_angle(&mut self) -> StepAngle {
        self.angle = self.angle.halved();
        self.angle
    }

    pub fn double_angle(&mut self) -> StepAngle {
        self.angle = self.angle.doubled();
        self.angle
    }

    pub fn can_rotate(&self, wall: Wall) -> bool {
        self.locks.can_rotate(wall)
    }

    pub fn check(&self, wall: Wall) -> CubeResult<()> {
        match self.locks.blocking(wall) {
            Some(blocking) => Err(CubeError::WallLocked { wall, blocking }),
            None => Ok(()),
        }
    }

    /// `T(center) * R(axis, degrees) * T(-center)`.
    pub fn wall_transform(center: Vec3, wall: Wall, degrees: f32) -> Mat4 {
        let to_origin = Mat4::from_translation(-center);
        let rotation = Mat4::from_axis_angle(wall.rotation_axis(), degrees.to_radians());
        let back = Mat4::from_translation(center);
        back * rotation * to_origin
    }

    /// Turn `wall` by the current signed angle.
    ///
    /// Membership is taken from the live positions in `cubes` relative to
    /// `center`. No lock check happens here; callers go through
    /// [`FaceRotationEngine::check`] first.
    pub fn rotate(&mut self, cubes: &mut [RigidSubCube], center: Vec3, wall: Wall) -> RotationReport {
        let signed_degrees = self.signed_degrees();
        debug!("Rotating {wall} wall by {signed_degrees} degrees");

        let transform = Self::wall_transform(center, wall, signed_degrees as f32);
        let mut moved = Vec::with_capacity(9);
        for cube in cubes.iter_mut() {
            if wall.contains(center, cube.position()) {
                cube.apply_placement(transform);
                moved.push(cube.id());
            }
        }

        let lock_toggled = self.angle.is_half_turn().then(|| {
            let set = self.locks.toggle(wall);
            info!(
                "{wall} wall is {}",
                if set { "mid-turn" } else { "settled" }
            );
            set
        });

        RotationReport {
            wall,
            signed_degrees,
            moved,
            lock_toggled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halving_stops_at_the_floor() {
        let mut engine = FaceRotationEngine::new();
        engine.double_angle();
        assert_eq!(engine.angle().degrees(), 180);
        let seq: Vec<u16> = (0..3).map(|_| engine.halve_angle().degrees()).collect();
        assert_eq!(seq, vec![90, 45, 45]);
    }

    #[test]
    fn doubling_stops_at_the_ceiling() {
        let mut engine = FaceRotationEngine::new();
        let seq: Vec<u16> = (0..3).map(|_| engine.double_angle().degrees()).collect();
        assert_eq!(seq, vec![180, 180, 180]);
    }

    #[test]
    fn direction_flips_in_pairs() {
        let mut engine = FaceRotationEngine::new();
        let original = engine.signed_degrees();
        engine.flip_direction();
        assert_eq!(engine.signed_degrees(), -original);
        engine.flip_direction();
        assert_eq!(engine.signed_degrees(), original);
    }

    #[test]
    fn locks_only_block_other_axes() {
        let mut locks = FaceLocks::default();
        assert!(locks.toggle(Wall::Up));
        assert!(locks.can_rotate(Wall::Up));
        assert!(locks.can_rotate(Wall::Down));
        assert_eq!(locks.blocking(Wall::Right), Some(Wall::Up));
        assert_eq!(locks.blocking(Wall::Front), Some(Wall::Up));
        assert!(!locks.toggle(Wall::Up));
        assert!(Wall::ALL.into_iter().all(|wall| !locks.is_set(wall)));
    }

    #[test]
    fn check_reports_the_blocking_wall() {
        let mut engine = FaceRotationEngine::new();
        engine.locks.toggle(Wall::Back);
        assert_eq!(
            engine.check(Wall::Left),
            Err(CubeError::WallLocked {
                wall: Wall::Left,
                blocking: Wall::Back
            })
        );
        assert!(engine.check(Wall::Front).is_ok());
    }

    #[test]
    fn wall_transform_keeps_the_pivot_fixed() {
        let center = Vec3::new(2.0, -1.0, 4.0);
        let transform = FaceRotationEngine::wall_transform(center, Wall::Up, 90.0);
        assert!(transform.transform_point3(center).abs_diff_eq(center, 1e-5));

        let moved = transform.transform_point3(center + Vec3::X);
        assert!(moved.abs_diff_eq(center + Vec3::NEG_Z, 1e-5));
    }
}
