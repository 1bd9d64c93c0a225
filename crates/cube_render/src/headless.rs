use glam::{Mat4, Vec3};
use tracing::debug;

use crate::{CubeRenderer, RenderError, RenderPass, RenderResult, Rgba, ViewportRect};

const HALF_EXTENT: f32 = 0.5;

#[derive(Debug, Clone)]
struct DrawCall {
    mvp: Mat4,
    inverse: Mat4,
    color: Rgba,
}

#[derive(Debug, Clone, Default)]
struct PassTarget {
    clear: Rgba,
    draws: Vec<DrawCall>,
}

/// CPU stand-in for a GPU backend.
///
/// Draw calls are recorded per pass; pixels are resolved on read-back by
/// casting the pixel's ray through every recorded unit cube and keeping the
/// nearest hit, which is what a depth-tested rasterizer would have written.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    viewport: ViewportRect,
    active: Option<(RenderPass, PassTarget)>,
    visible: Option<PassTarget>,
    picking: Option<PassTarget>,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: ViewportRect::from_size(width, height),
            active: None,
            visible: None,
            picking: None,
        }
    }

    /// Colours submitted in the last completed visible pass.
    pub fn visible_colors(&self) -> Vec<Rgba> {
        self.visible
            .as_ref()
            .map(|target| target.draws.iter().map(|draw| draw.color).collect())
            .unwrap_or_default()
    }

    fn sample(target: &PassTarget, ndc_x: f32, ndc_y: f32) -> Rgba {
        let mut nearest: Option<(f32, Rgba)> = None;
        for draw in &target.draws {
            let Some(depth) = Self::hit_depth(draw, ndc_x, ndc_y) else {
                continue;
            };
            if nearest.map_or(true, |(best, _)| depth < best) {
                nearest = Some((depth, draw.color));
            }
        }
        nearest.map_or(target.clear, |(_, color)| color)
    }

    /// NDC depth of the first point where the pixel ray enters the cube.
    fn hit_depth(draw: &DrawCall, ndc_x: f32, ndc_y: f32) -> Option<f32> {
        let near = draw.inverse.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far = draw.inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }
        let dir = far - near;

        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;
        for axis in 0..3 {
            let (origin, d) = (near[axis], dir[axis]);
            if d.abs() < f32::EPSILON {
                if origin.abs() > HALF_EXTENT {
                    return None;
                }
                continue;
            }
            let t1 = (-HALF_EXTENT - origin) / d;
            let t2 = (HALF_EXTENT - origin) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }

        let depth = draw.mvp.project_point3(near + dir * t_min).z;
        depth.is_finite().then_some(depth)
    }
}

impl CubeRenderer for HeadlessRenderer {
    fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    fn resize(&mut self, width: u32, height: u32) {
        debug!("Headless target resized to {width}x{height}");
        self.viewport = ViewportRect::from_size(width, height);
        self.visible = None;
        self.picking = None;
    }

    fn begin_pass(&mut self, pass: RenderPass, clear: Rgba) -> RenderResult<()> {
        if let Some((active, _)) = &self.active {
            return Err(RenderError::PassInProgress(*active));
        }
        self.active = Some((
            pass,
            PassTarget {
                clear,
                draws: Vec::new(),
            },
        ));
        Ok(())
    }

    fn draw_unit_cube(&mut self, mvp: Mat4, color: Rgba, picking: bool) -> RenderResult<()> {
        let (pass, target) = self.active.as_mut().ok_or(RenderError::NoActivePass)?;
        if *pass == RenderPass::Picking && !picking {
            return Err(RenderError::LitDrawInPickingPass);
        }
        target.draws.push(DrawCall {
            mvp,
            inverse: mvp.inverse(),
            color,
        });
        Ok(())
    }

    fn end_pass(&mut self) -> RenderResult<()> {
        let (pass, target) = self.active.take().ok_or(RenderError::NoActivePass)?;
        match pass {
            RenderPass::Visible => self.visible = Some(target),
            RenderPass::Picking => self.picking = Some(target),
        }
        Ok(())
    }

    fn read_pixel_color(&self, x: u32, y: u32) -> RenderResult<Rgba> {
        let vp = self.viewport;
        let inside = x >= vp.x && y >= vp.y && x - vp.x < vp.width && y - vp.y < vp.height;
        if !inside {
            return Err(RenderError::PixelOutOfBounds {
                x,
                y,
                width: vp.width,
                height: vp.height,
            });
        }
        let target = self.picking.as_ref().ok_or(RenderError::NotReady)?;

        let ndc_x = ((x - vp.x) as f32 + 0.5) / vp.width as f32 * 2.0 - 1.0;
        let ndc_y = ((y - vp.y) as f32 + 0.5) / vp.height as f32 * 2.0 - 1.0;
        Ok(Self::sample(target, ndc_x, ndc_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn view_projection() -> Mat4 {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        Mat4::perspective_rh_gl(45f32.to_radians(), 1.0, 0.1, 100.0) * view
    }

    #[test]
    fn nearest_cube_wins() {
        let vp = view_projection();
        let mut renderer = HeadlessRenderer::new(100, 100);
        renderer.begin_pass(RenderPass::Picking, [0; 4]).unwrap();
        renderer.draw_unit_cube(vp, RED, true).unwrap();
        renderer
            .draw_unit_cube(vp * Mat4::from_translation(Vec3::Z), BLUE, true)
            .unwrap();
        renderer.end_pass().unwrap();

        assert_eq!(renderer.read_pixel_color(50, 50), Ok(BLUE));
        assert_eq!(renderer.read_pixel_color(0, 0), Ok([0; 4]));
    }

    #[test]
    fn pixel_rows_count_from_the_bottom() {
        let vp = view_projection();
        let mut renderer = HeadlessRenderer::new(100, 100);
        renderer.begin_pass(RenderPass::Picking, [0; 4]).unwrap();
        renderer
            .draw_unit_cube(vp * Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0)), RED, true)
            .unwrap();
        renderer.end_pass().unwrap();

        assert_eq!(renderer.read_pixel_color(50, 85), Ok(RED));
        assert_eq!(renderer.read_pixel_color(50, 15), Ok([0; 4]));
    }

    #[test]
    fn passes_must_be_balanced() {
        let mut renderer = HeadlessRenderer::new(10, 10);
        assert_eq!(
            renderer.draw_unit_cube(Mat4::IDENTITY, RED, false),
            Err(RenderError::NoActivePass)
        );
        renderer.begin_pass(RenderPass::Visible, [0; 4]).unwrap();
        assert_eq!(
            renderer.begin_pass(RenderPass::Picking, [0; 4]),
            Err(RenderError::PassInProgress(RenderPass::Visible))
        );
        renderer.end_pass().unwrap();
        assert_eq!(renderer.end_pass(), Err(RenderError::NoActivePass));
    }

    #[test]
    fn picking_pass_rejects_lit_draws() {
        let mut renderer = HeadlessRenderer::new(10, 10);
        renderer.begin_pass(RenderPass::Picking, [0; 4]).unwrap();
        assert_eq!(
            renderer.draw_unit_cube(Mat4::IDENTITY, RED, false),
            Err(RenderError::LitDrawInPickingPass)
        );
    }

    #[test]
    fn resize_drops_stale_targets() {
        let mut renderer = HeadlessRenderer::new(10, 10);
        renderer.begin_pass(RenderPass::Picking, [0; 4]).unwrap();
        renderer.end_pass().unwrap();
        assert!(renderer.read_pixel_color(5, 5).is_ok());
        renderer.resize(20, 30);
        assert_eq!(renderer.viewport(), ViewportRect::from_size(20, 30));
        assert_eq!(renderer.read_pixel_color(5, 5), Err(RenderError::NotReady));
        assert!(matches!(
            renderer.read_pixel_color(20, 5),
            Err(RenderError::PixelOutOfBounds { .. })
        ));
    }
}
