//! The drawing surface: a growable RGBA ink raster plus its background.

use crate::expansion::ExpansionResult;
use crate::shapes::{Background, InkColor};
use image::{Rgba, RgbaImage, imageops};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raster errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Pixel data has {actual} bytes, expected {expected} for {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A `width x height` RGBA8 image with straight (non-premultiplied) alpha.
///
/// Pixel `(x, y)` covers the surface area `[x, x + 1) x [y, y + 1)`.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl From<RgbaImage> for RasterBuffer {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl RasterBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        RgbaImage::new(width, height).into()
    }

    /// Create a buffer filled with a single color.
    pub fn filled(width: u32, height: u32, color: InkColor) -> Self {
        RgbaImage::from_pixel(width, height, Rgba(color.to_array())).into()
    }

    /// Wrap existing RGBA8 data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        if actual != expected {
            return Err(SurfaceError::DimensionMismatch {
                width,
                height,
                expected,
                actual,
            });
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(Self::from)
            .ok_or(SurfaceError::DimensionMismatch {
                width,
                height,
                expected,
                actual,
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|px| px.0)
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(px) = self.image.get_pixel_mut_checked(x, y) {
            *px = Rgba(rgba);
        }
    }

    /// Alpha of the pixel containing a surface point (0 outside the buffer).
    pub fn alpha_at(&self, point: Point) -> u8 {
        if !(point.x >= 0.0 && point.y >= 0.0) {
            return 0;
        }
        self.pixel(point.x.floor() as u32, point.y.floor() as u32)
            .map_or(0, |px| px[3])
    }

    /// Composite `color` over the pixel with the given coverage (source-over).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: InkColor, coverage: f32) {
        let sa = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let Some(Rgba(dst)) = self.image.get_pixel_mut_checked(x, y) else {
            return;
        };
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let src = [color.r, color.g, color.b];
        for c in 0..3 {
            let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Remove ink from the pixel in proportion to `coverage` (destination-out).
    pub fn erase_pixel(&mut self, x: u32, y: u32, coverage: f32) {
        let Some(px) = self.image.get_pixel_mut_checked(x, y) else {
            return;
        };
        let keep = 1.0 - coverage.clamp(0.0, 1.0);
        let alpha = (px[3] as f32 * keep).round() as u8;
        if alpha == 0 {
            *px = TRANSPARENT;
        } else {
            px[3] = alpha;
        }
    }

    /// Clear a rectangle of pixels to transparent, clipped to the buffer.
    pub fn clear_rect(&mut self, x: i64, y: i64, width: i64, height: i64) {
        let x0 = x.clamp(0, self.width() as i64) as u32;
        let y0 = y.clamp(0, self.height() as i64) as u32;
        let x1 = (x + width).clamp(0, self.width() as i64) as u32;
        let y1 = (y + height).clamp(0, self.height() as i64) as u32;
        for row in y0..y1 {
            for col in x0..x1 {
                self.image.put_pixel(col, row, TRANSPARENT);
            }
        }
    }

    /// Copy `src` into this buffer with its top-left at `(dx, dy)`, clipped.
    pub fn blit(&mut self, src: &RasterBuffer, dx: u32, dy: u32) {
        imageops::replace(&mut self.image, &src.image, dx as i64, dy as i64);
    }

    /// Bounding box of all pixels with non-zero alpha.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.image
            .enumerate_pixels()
            .filter(|(_, _, px)| px[3] != 0)
            .fold(None, |bounds, (x, y, _)| {
                Some(match bounds {
                    Some((x0, y0, x1, y1)) => (x.min(x0), y.min(y0), x.max(x1), y.max(y1)),
                    None => (x, y, x, y),
                })
            })
            .map(|(x0, y0, x1, y1)| {
                Rect::new(x0 as f64, y0 as f64, x1 as f64 + 1.0, y1 as f64 + 1.0)
            })
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|px| px[3] == 0)
    }
}

/// Size and view state of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub width: u32,
    pub height: u32,
    /// Screen position of the surface origin.
    pub pan: Vec2,
    pub zoom: f64,
}

/// Full copy of the ink raster at one point in time.
#[derive(Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    raster: RasterBuffer,
}

impl fmt::Debug for SurfaceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceSnapshot")
            .field("width", &self.raster.width())
            .field("height", &self.raster.height())
            .finish()
    }
}

impl SurfaceSnapshot {
    /// A blank snapshot of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            raster: RasterBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }
}

/// The live drawing surface.
#[derive(Debug, Clone)]
pub struct Surface {
    ink: RasterBuffer,
    background: Background,
}

impl Surface {
    /// Create a blank surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            ink: RasterBuffer::new(width, height),
            background: Background::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.ink.width()
    }

    pub fn height(&self) -> u32 {
        self.ink.height()
    }

    /// Committed and in-progress ink.
    pub fn ink(&self) -> &RasterBuffer {
        &self.ink
    }

    pub fn ink_mut(&mut self) -> &mut RasterBuffer {
        &mut self.ink
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Copy the current ink into a snapshot.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            raster: self.ink.clone(),
        }
    }

    /// Replace the ink with a copy of `snapshot`, including its size.
    pub fn restore(&mut self, snapshot: &SurfaceSnapshot) {
        self.ink.clone_from(&snapshot.raster);
    }

    /// Drop all ink and resize to `width x height`.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.ink = RasterBuffer::new(width, height);
    }

    /// Grow the raster as planned, keeping existing ink at the content offset.
    pub fn apply_expansion(&mut self, expansion: &ExpansionResult) {
        if !expansion.expanded {
            return;
        }
        let mut grown = RasterBuffer::new(expansion.geometry.width, expansion.geometry.height);
        grown.blit(
            &self.ink,
            expansion.content_offset.x as u32,
            expansion.content_offset.y as u32,
        );
        self.ink = grown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_blank() {
        let raster = RasterBuffer::new(4, 3);
        assert_eq!(raster.pixels().len(), 48);
        assert!(raster.is_blank());
        assert_eq!(raster.content_bounds(), None);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        let err = RasterBuffer::from_pixels(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, SurfaceError::DimensionMismatch { expected: 16, .. }));
        assert!(RasterBuffer::from_pixels(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_blend_opaque_over_transparent() {
        let mut raster = RasterBuffer::new(2, 2);
        raster.blend_pixel(1, 0, InkColor::new(200, 100, 50, 255), 1.0);
        assert_eq!(raster.pixel(1, 0), Some([200, 100, 50, 255]));
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_blend_half_coverage() {
        let mut raster = RasterBuffer::filled(1, 1, InkColor::WHITE);
        raster.blend_pixel(0, 0, InkColor::BLACK, 0.5);
        let px = raster.pixel(0, 0).unwrap();
        assert!((px[0] as i32 - 128).abs() <= 1);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_erase_pixel() {
        let mut raster = RasterBuffer::filled(1, 1, InkColor::BLACK);
        raster.erase_pixel(0, 0, 1.0);
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_alpha_at_floors_and_clips() {
        let mut raster = RasterBuffer::new(4, 4);
        raster.set_pixel(2, 3, [1, 2, 3, 99]);
        assert_eq!(raster.alpha_at(Point::new(2.9, 3.1)), 99);
        assert_eq!(raster.alpha_at(Point::new(-0.5, 3.0)), 0);
        assert_eq!(raster.alpha_at(Point::new(10.0, 1.0)), 0);
        assert_eq!(raster.alpha_at(Point::new(f64::NAN, 1.0)), 0);
    }

    #[test]
    fn test_clear_rect_clips() {
        let mut raster = RasterBuffer::filled(5, 5, InkColor::BLACK);
        raster.clear_rect(-2, -2, 4, 4);
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(2, 2), Some([0, 0, 0, 255]));
        raster.clear_rect(3, 3, 100, 100);
        assert_eq!(raster.pixel(4, 4), Some([0, 0, 0, 0]));
        assert_eq!(raster.content_bounds(), Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_blit_with_offset() {
        let mut src = RasterBuffer::new(2, 2);
        src.set_pixel(0, 0, [9, 9, 9, 255]);
        src.set_pixel(1, 1, [7, 7, 7, 255]);
        let mut dst = RasterBuffer::new(4, 4);
        dst.blit(&src, 2, 1);
        assert_eq!(dst.pixel(2, 1), Some([9, 9, 9, 255]));
        assert_eq!(dst.pixel(3, 2), Some([7, 7, 7, 255]));
        assert_eq!(dst.content_bounds(), Some(Rect::new(2.0, 1.0, 4.0, 3.0)));
    }

    #[test]
    fn test_blit_clips_at_far_edge() {
        let src = RasterBuffer::filled(3, 3, InkColor::BLACK);
        let mut dst = RasterBuffer::new(4, 4);
        dst.blit(&src, 2, 2);
        assert_eq!(dst.content_bounds(), Some(Rect::new(2.0, 2.0, 4.0, 4.0)));

        // Entirely outside: nothing is copied.
        dst.blit(&src, 10, 0);
        assert_eq!(dst.image().pixels().filter(|px| px[3] != 0).count(), 4);
    }

    #[test]
    fn test_snapshot_restore_resizes() {
        let mut surface = Surface::new(10, 10);
        surface.ink_mut().set_pixel(3, 3, [1, 1, 1, 255]);
        let snapshot = surface.snapshot();

        surface.reset(20, 15);
        assert_eq!((surface.width(), surface.height()), (20, 15));

        surface.restore(&snapshot);
        assert_eq!((surface.width(), surface.height()), (10, 10));
        assert_eq!(surface.ink(), snapshot.raster());
    }

    #[test]
    fn test_apply_expansion_preserves_content_at_offset() {
        let mut surface = Surface::new(10, 10);
        surface.ink_mut().set_pixel(0, 0, [5, 6, 7, 255]);
        let before = surface.ink().clone();

        let expansion = ExpansionResult {
            expanded: true,
            geometry: SurfaceGeometry {
                width: 30,
                height: 10,
                pan: Vec2::ZERO,
                zoom: 1.0,
            },
            content_offset: Vec2::new(20.0, 0.0),
        };
        surface.apply_expansion(&expansion);

        assert_eq!((surface.width(), surface.height()), (30, 10));
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(surface.ink().pixel(x + 20, y), before.pixel(x, y));
            }
        }
        assert_eq!(surface.ink().pixel(0, 0), Some([0, 0, 0, 0]));
    }
}
