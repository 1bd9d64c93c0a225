use std::fmt;

use axes::{Axis, AxisDirection};
use glam::Vec3;

/// Tolerance used when comparing live sub-cube positions against a wall plane.
pub const WALL_EPSILON: f32 = 1e-2;

/// One of the six 3x3 outer slabs, named relative to the center cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    Right,
    Left,
    Up,
    Down,
    Back,
    Front,
}

impl Wall {
    pub const ALL: [Wall; 6] = [
        Wall::Right,
        Wall::Left,
        Wall::Up,
        Wall::Down,
        Wall::Back,
        Wall::Front,
    ];

    pub const fn index(self) -> usize {
        match self {
            Wall::Right => 0,
            Wall::Left => 1,
            Wall::Up => 2,
            Wall::Down => 3,
            Wall::Back => 4,
            Wall::Front => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Wall::Right => "Right",
            Wall::Left => "Left",
            Wall::Up => "Up",
            Wall::Down => "Down",
            Wall::Back => "Back",
            Wall::Front => "Front",
        }
    }

    /// Letter of the key bound to this wall.
    pub const fn key(self) -> char {
        match self {
            Wall::Right => 'R',
            Wall::Left => 'L',
            Wall::Up => 'U',
            Wall::Down => 'D',
            Wall::Back => 'B',
            Wall::Front => 'F',
        }
    }

    /// Outward normal of the wall, relative to the center cube.
    pub const fn axis(self) -> Axis {
        match self {
            Wall::Right => Axis::positive(AxisDirection::X),
            Wall::Left => Axis::negative(AxisDirection::X),
            Wall::Up => Axis::positive(AxisDirection::Y),
            Wall::Down => Axis::negative(AxisDirection::Y),
            Wall::Back => Axis::positive(AxisDirection::Z),
            Wall::Front => Axis::negative(AxisDirection::Z),
        }
    }

    /// Axis every turn of this wall rotates about. Both walls of a pair share
    /// the positive axis.
    pub fn rotation_axis(self) -> Vec3 {
        self.axis().direction().unit()
    }

    pub fn shares_axis_with(self, other: Wall) -> bool {
        self.axis().is_parallel_to(other.axis())
    }

    /// Whether a sub-cube at `position` currently sits in this wall.
    pub fn contains(self, center: Vec3, position: Vec3) -> bool {
        (self.axis().offset(center, position) - 1.0).abs() < WALL_EPSILON
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, wall) in Wall::ALL.iter().enumerate() {
            assert_eq!(wall.index(), i);
        }
    }

    #[test]
    fn pairs_share_an_axis() {
        assert!(Wall::Right.shares_axis_with(Wall::Left));
        assert!(Wall::Up.shares_axis_with(Wall::Down));
        assert!(Wall::Back.shares_axis_with(Wall::Front));
        assert!(!Wall::Right.shares_axis_with(Wall::Up));
        assert_eq!(Wall::Left.rotation_axis(), Vec3::X);
        assert_eq!(Wall::Front.rotation_axis(), Vec3::Z);
    }

    #[test]
    fn membership_follows_the_center() {
        let center = Vec3::new(3.0, -1.0, 0.0);
        assert!(Wall::Right.contains(center, Vec3::new(4.0, 5.0, 5.0)));
        assert!(Wall::Left.contains(center, Vec3::new(2.0, 0.0, 0.0)));
        assert!(Wall::Down.contains(center, Vec3::new(0.0, -2.0 + 0.005, 0.0)));
        assert!(!Wall::Up.contains(center, Vec3::new(3.0, -1.0, 0.0)));
        assert!(!Wall::Back.contains(center, Vec3::new(3.0, -1.0, 1.05)));
    }
}
