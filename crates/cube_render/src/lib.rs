mod frame;
mod headless;
mod picking;
mod projection;

use glam::Mat4;
use thiserror::Error;

pub use frame::{pick, render_frame, render_picking_pass, FrameMatrices, FrameStats, VISIBLE_CLEAR, VISIBLE_COLOR};
pub use headless::HeadlessRenderer;
pub use picking::{decode_pick_color, encode_pick_color, framebuffer_row, resolve_pick, PICK_CLEAR};
pub use projection::{project, unproject};

/// RGBA8 colour as written to and read back from a framebuffer.
pub type Rgba = [u8; 4];

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no render pass is in progress")]
    NoActivePass,
    #[error("a {0:?} pass is already in progress")]
    PassInProgress(RenderPass),
    #[error("lit draw submitted to the picking pass")]
    LitDrawInPickingPass,
    #[error("no picking pass has been rendered yet")]
    NotReady,
    #[error("pixel ({x}, {y}) lies outside the {width}x{height} framebuffer")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

/// Which colour target a pass writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Lit, uniformly coloured cubes shown to the user.
    Visible,
    /// Flat identity colours, lighting and blending off, read back when picking.
    Picking,
}

/// Rectangle defining the 3D viewport area (in physical pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewportRect {
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// What the cube session needs from a graphics backend.
///
/// Framebuffer coordinates passed to [`CubeRenderer::read_pixel_color`] have
/// their origin at the bottom-left corner, like a GL read-back.
pub trait CubeRenderer {
    fn viewport(&self) -> ViewportRect;
    fn resize(&mut self, width: u32, height: u32);
    fn begin_pass(&mut self, pass: RenderPass, clear: Rgba) -> RenderResult<()>;
    /// Draw the unit cube `[-0.5, 0.5]^3` transformed by `mvp`.
    fn draw_unit_cube(&mut self, mvp: Mat4, color: Rgba, picking: bool) -> RenderResult<()>;
    fn end_pass(&mut self) -> RenderResult<()>;
    /// Read one pixel of the most recent picking pass.
    fn read_pixel_color(&self, x: u32, y: u32) -> RenderResult<Rgba>;
}
