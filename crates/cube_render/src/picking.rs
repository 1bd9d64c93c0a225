//! Identity colours for the picking pass and their read-back.
//!
//! Identity `i` is drawn as the 24-bit value `i + 1` spread over R, G and B,
//! low byte first. The picking target is cleared to zero, so an empty pixel
//! never aliases cube 0.

use cube_core::CubeId;
use tracing::debug;

use crate::{CubeRenderer, RenderError, RenderResult, Rgba};

/// Clear colour of the picking target.
pub const PICK_CLEAR: Rgba = [0, 0, 0, 0];

pub fn encode_pick_color(id: CubeId) -> Rgba {
    let value = u32::from(id.get()) + 1;
    let [r, g, b, _] = value.to_le_bytes();
    [r, g, b, u8::MAX]
}

/// `None` for the background and for any value no cube is drawn with.
pub fn decode_pick_color(color: Rgba) -> Option<CubeId> {
    let [r, g, b, _] = color;
    let value = u32::from_le_bytes([r, g, b, 0]);
    let raw = value.checked_sub(1)?;
    CubeId::new(u8::try_from(raw).ok()?)
}

/// Framebuffer row under a cursor row counted from the top of a window of
/// `height` pixels.
pub fn framebuffer_row(height: u32, cursor_y: u32) -> Option<u32> {
    height.checked_sub(1)?.checked_sub(cursor_y)
}

/// Read back the picking target under a cursor position given in window
/// pixels (origin top-left) and decode it.
pub fn resolve_pick<R>(renderer: &R, cursor_x: u32, cursor_y: u32) -> RenderResult<Option<CubeId>>
where
    R: CubeRenderer + ?Sized,
{
    let viewport = renderer.viewport();
    let out_of_bounds = RenderError::PixelOutOfBounds {
        x: cursor_x,
        y: cursor_y,
        width: viewport.width,
        height: viewport.height,
    };
    if cursor_x >= viewport.width {
        return Err(out_of_bounds);
    }
    let row = framebuffer_row(viewport.height, cursor_y).ok_or(out_of_bounds)?;

    let color = renderer.read_pixel_color(viewport.x + cursor_x, viewport.y + row)?;
    let picked = decode_pick_color(color);
    debug!(?color, ?picked, "Pick read-back at ({cursor_x}, {cursor_y})");
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::VISIBLE_COLOR;

    #[test]
    fn every_identity_survives_the_colour_codec() {
        let mut colors = std::collections::HashSet::new();
        for id in CubeId::all() {
            let color = encode_pick_color(id);
            assert_eq!(color[3], 255);
            assert_ne!(color, PICK_CLEAR);
            assert!(colors.insert(color));
            assert_eq!(decode_pick_color(color), Some(id));
        }
    }

    #[test]
    fn background_and_visible_colours_decode_to_nothing() {
        assert_eq!(decode_pick_color(PICK_CLEAR), None);
        assert_eq!(decode_pick_color([0, 0, 0, 255]), None);
        assert_eq!(decode_pick_color(VISIBLE_COLOR), None);
        assert_eq!(decode_pick_color([28, 0, 0, 255]), None);
        assert_eq!(decode_pick_color([1, 1, 0, 255]), None);
    }

    #[test]
    fn cube_zero_is_not_the_background() {
        let zero = CubeId::new(0).unwrap();
        assert_eq!(encode_pick_color(zero), [1, 0, 0, 255]);
    }

    #[test]
    fn rows_flip_to_bottom_up() {
        assert_eq!(framebuffer_row(800, 0), Some(799));
        assert_eq!(framebuffer_row(800, 799), Some(0));
        assert_eq!(framebuffer_row(800, 800), None);
        assert_eq!(framebuffer_row(0, 0), None);
    }
}
