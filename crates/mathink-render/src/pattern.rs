//! Grid and dot backgrounds.

use kurbo::Point;
use mathink_core::shapes::{Background, InkColor};
use mathink_core::surface::RasterBuffer;

/// Grid cell size in pixels.
pub const GRID_SIZE: u32 = 20;
/// Dot cell size in pixels.
pub const DOT_SPACING: u32 = 10;
/// Dot radius in pixels.
pub const DOT_RADIUS: f64 = 1.0;

/// Width of a grid hairline.
const GRID_LINE_WIDTH: f64 = 0.5;

/// Opaque fill painted under a pattern.
pub fn board_fill(dark_mode: bool) -> InkColor {
    if dark_mode {
        InkColor::DARK_BOARD
    } else {
        InkColor::WHITE
    }
}

/// Coverage of a pixel by a grid tile's left and top hairlines.
///
/// Each tile only keeps the half of its hairline that falls inside it.
fn grid_coverage(x: u32, y: u32) -> f32 {
    let edge = (GRID_LINE_WIDTH / 2.0) as f32;
    let cx = if x % GRID_SIZE == 0 { edge } else { 0.0 };
    let cy = if y % GRID_SIZE == 0 { edge } else { 0.0 };
    1.0 - (1.0 - cx) * (1.0 - cy)
}

/// Coverage of a pixel by the dot in the middle of its cell.
fn dot_coverage(x: u32, y: u32) -> f32 {
    let half = DOT_SPACING as f64 / 2.0;
    let center = Point::new(half, half);
    let pixel = Point::new((x % DOT_SPACING) as f64 + 0.5, (y % DOT_SPACING) as f64 + 0.5);
    (DOT_RADIUS + 0.5 - pixel.distance(center)).clamp(0.0, 1.0) as f32
}

/// Render a pattern background across a whole surface.
///
/// Returns `None` for backgrounds that are not painted into the raster.
pub fn render_background(
    background: Background,
    dark_mode: bool,
    width: u32,
    height: u32,
) -> Option<RasterBuffer> {
    let coverage: fn(u32, u32) -> f32 = match background {
        Background::Grid => grid_coverage,
        Background::Dots => dot_coverage,
        Background::Transparent | Background::Color(_) => return None,
    };
    let mut raster = RasterBuffer::filled(width, height, board_fill(dark_mode));
    for y in 0..height {
        for x in 0..width {
            let c = coverage(x, y);
            if c > 0.0 {
                raster.blend_pixel(x, y, InkColor::GRAY, c);
            }
        }
    }
    Some(raster)
}
