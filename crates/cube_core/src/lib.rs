//! Transform model of a 3x3x3 cube built from 27 rigid sub-cubes.
//!
//! Every sub-cube carries its own placement transform, so the whole state of
//! the puzzle is the set of 27 matrices. Face turns, picking-mode drags and
//! arrow-key pans all compose onto those matrices; nothing is cached between
//! calls, and wall membership is re-derived from live positions every time.

mod assembly;
mod manipulation;
mod rotation;
mod sub_cube;
mod wall;

use thiserror::Error;

pub use assembly::{generate_small_cubes, CubeAssembly};
pub use manipulation::{PanDirection, MAX_ORBIT_PITCH_DEG};
pub use rotation::{FaceLocks, FaceRotationEngine, RotationDirection, RotationReport, StepAngle};
pub use sub_cube::{CubeId, RigidSubCube, CENTER_ID, CUBE_COUNT};
pub use wall::{Wall, WALL_EPSILON};

/// Convenience alias for fallible cube operations.
pub type CubeResult<T> = Result<T, CubeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeError {
    #[error("{wall} wall is locked while the {blocking} wall is mid-turn")]
    WallLocked { wall: Wall, blocking: Wall },
    #[error("no sub-cube is selected")]
    NothingSelected,
}
