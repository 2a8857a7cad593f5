//! Renderer trait abstraction.

use kurbo::{BezPath, Point};
use mathink_core::shapes::Brush;
use mathink_core::surface::{RasterBuffer, Surface};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Trait for rasterizing backends.
///
/// All coordinates are surface pixels. Drawing outside the target is clipped.
pub trait Renderer {
    /// Stroke a path with round caps and joins. A subpath without segments
    /// is drawn as a dot.
    fn stroke_path(&self, target: &mut RasterBuffer, path: &BezPath, brush: &Brush);

    /// Composite the background and ink into one opaque-where-drawn raster.
    fn flatten(&self, surface: &Surface, dark_mode: bool) -> RasterBuffer;

    /// Stroke a single segment.
    fn stroke_segment(&self, target: &mut RasterBuffer, from: Point, to: Point, brush: &Brush) {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        self.stroke_path(target, &path, brush);
    }

    /// Stroke a polyline through `points`.
    fn stroke_points(&self, target: &mut RasterBuffer, points: &[Point], brush: &Brush) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut path = BezPath::new();
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        self.stroke_path(target, &path, brush);
    }
}
