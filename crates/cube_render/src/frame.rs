use cube_core::{CubeAssembly, CubeId};
use glam::Mat4;
use tracing::trace;

use crate::{
    picking::{encode_pick_color, resolve_pick, PICK_CLEAR},
    CubeRenderer, RenderPass, RenderResult, Rgba,
};

/// Uniform colour of every cube in the visible pass.
pub const VISIBLE_COLOR: Rgba = [255, 255, 255, 255];
pub const VISIBLE_CLEAR: Rgba = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameMatrices {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub visible_draws: usize,
    pub picking_draws: usize,
}

/// Draw the assembly, plus the picking pass while picking mode is on.
pub fn render_frame<R>(renderer: &mut R, assembly: &CubeAssembly, matrices: &FrameMatrices) -> RenderResult<FrameStats>
where
    R: CubeRenderer + ?Sized,
{
    let view_projection = matrices.view_projection();
    renderer.begin_pass(RenderPass::Visible, VISIBLE_CLEAR)?;
    for cube in assembly.cubes() {
        renderer.draw_unit_cube(view_projection * cube.model_matrix(), VISIBLE_COLOR, false)?;
    }
    renderer.end_pass()?;

    let mut stats = FrameStats {
        visible_draws: assembly.cubes().len(),
        picking_draws: 0,
    };
    if assembly.picking_mode() {
        stats.picking_draws = render_picking_pass(renderer, assembly, matrices)?;
    }
    trace!(?stats, "Frame submitted");
    Ok(stats)
}

/// Draw every cube in its identity colour. Returns the number of draws.
pub fn render_picking_pass<R>(renderer: &mut R, assembly: &CubeAssembly, matrices: &FrameMatrices) -> RenderResult<usize>
where
    R: CubeRenderer + ?Sized,
{
    let view_projection = matrices.view_projection();
    renderer.begin_pass(RenderPass::Picking, PICK_CLEAR)?;
    for cube in assembly.cubes() {
        renderer.draw_unit_cube(view_projection * cube.model_matrix(), encode_pick_color(cube.id()), true)?;
    }
    renderer.end_pass()?;
    Ok(assembly.cubes().len())
}

/// Refresh the picking target and decode the cube under the cursor.
pub fn pick<R>(
    renderer: &mut R,
    assembly: &CubeAssembly,
    matrices: &FrameMatrices,
    cursor_x: u32,
    cursor_y: u32,
) -> RenderResult<Option<CubeId>>
where
    R: CubeRenderer + ?Sized,
{
    render_picking_pass(renderer, assembly, matrices)?;
    resolve_pick(renderer, cursor_x, cursor_y)
}
