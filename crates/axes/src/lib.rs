use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    X,
    Y,
    Z,
}

impl AxisDirection {
    /// Unit vector along the positive direction of this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            AxisDirection::X => Vec3::X,
            AxisDirection::Y => Vec3::Y,
            AxisDirection::Z => Vec3::Z,
        }
    }

    /// Read the coordinate of `v` that lies along this axis.
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            AxisDirection::X => v.x,
            AxisDirection::Y => v.y,
            AxisDirection::Z => v.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSign {
    Positive,
    Negative,
}

impl AxisSign {
    pub const fn scalar(self) -> f32 {
        match self {
            AxisSign::Positive => 1.0,
            AxisSign::Negative => -1.0,
        }
    }

    pub const fn invert(self) -> Self {
        match self {
            AxisSign::Positive => AxisSign::Negative,
            AxisSign::Negative => AxisSign::Positive,
        }
    }
}

/// A signed axis, e.g. `+X` or `-Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axis {
    direction: AxisDirection,
    sign: AxisSign,
}

impl Axis {
    pub const fn positive(direction: AxisDirection) -> Self {
        Self {
            direction,
            sign: AxisSign::Positive,
        }
    }

    pub const fn negative(direction: AxisDirection) -> Self {
        Self {
            direction,
            sign: AxisSign::Negative,
        }
    }

    pub const fn direction(&self) -> AxisDirection {
        self.direction
    }

    pub const fn sign(&self) -> AxisSign {
        self.sign
    }

    pub const fn inverted(self) -> Self {
        Self {
            direction: self.direction,
            sign: self.sign.invert(),
        }
    }

    /// Signed distance of `point` from `origin`, measured along this axis.
    ///
    /// For `-X` this is `origin.x - point.x`, so a point one unit "behind"
    /// the origin reads as `+1.0`.
    pub fn offset(self, origin: Vec3, point: Vec3) -> f32 {
        (self.direction.component(point) - self.direction.component(origin)) * self.sign.scalar()
    }

    /// Two axes are parallel when they share a direction, regardless of sign.
    pub fn is_parallel_to(self, other: Axis) -> bool {
        self.direction == other.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverting_flips_only_the_sign() {
        let axis = Axis::negative(AxisDirection::Z).inverted();
        assert_eq!(axis, Axis::positive(AxisDirection::Z));
        assert_eq!(axis.sign(), AxisSign::Positive);
        assert_eq!(axis.direction(), AxisDirection::Z);
    }

    #[test]
    fn offset_is_measured_along_the_signed_axis() {
        let origin = Vec3::new(0.5, 0.0, -2.0);
        let point = Vec3::new(-0.5, 3.0, -2.0);
        assert_eq!(Axis::positive(AxisDirection::X).offset(origin, point), -1.0);
        assert_eq!(Axis::negative(AxisDirection::X).offset(origin, point), 1.0);
        assert_eq!(Axis::positive(AxisDirection::Y).offset(origin, point), 3.0);
        assert_eq!(Axis::negative(AxisDirection::Z).offset(origin, point), 0.0);
    }

    #[test]
    fn parallel_ignores_sign() {
        let x = Axis::positive(AxisDirection::X);
        assert!(x.is_parallel_to(x.inverted()));
        assert!(!x.is_parallel_to(Axis::positive(AxisDirection::Z)));
    }
}
