//! CPU renderer implementation.

use crate::pattern::render_background;
use crate::renderer::Renderer;
use kurbo::{BezPath, PathEl, Point, Rect};
use mathink_core::shapes::{Brush, BrushMode, InkColor};
use mathink_core::surface::{RasterBuffer, Surface};

/// Curve flattening tolerance in pixels.
const DEFAULT_TOLERANCE: f64 = 0.1;

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Per-pixel coverage over a clipped region of the target.
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    /// Union of round-capped capsules around `segments`, clipped to the target.
    fn from_segments(
        segments: &[(Point, Point)],
        half_width: f64,
        target_width: u32,
        target_height: u32,
    ) -> Option<Self> {
        let reach = half_width + 1.0;
        let (first, _) = segments.first()?;
        let bounds = segments
            .iter()
            .fold(Rect::from_points(*first, *first), |r, (a, b)| {
                r.union_pt(*a).union_pt(*b)
            })
            .inflate(reach, reach);
        let clip = clip_to(bounds, target_width, target_height)?;

        let mut mask = Self {
            x0: clip.0,
            y0: clip.1,
            width: clip.2 - clip.0,
            height: clip.3 - clip.1,
            data: vec![0.0; ((clip.2 - clip.0) * (clip.3 - clip.1)) as usize],
        };
        for &(a, b) in segments {
            let seg_bounds = Rect::from_points(a, b).inflate(reach, reach);
            let Some((sx0, sy0, sx1, sy1)) = clip_to(seg_bounds, target_width, target_height)
            else {
                continue;
            };
            for y in sy0..sy1 {
                for x in sx0..sx1 {
                    let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    let coverage = (half_width + 0.5 - distance_to_segment(center, a, b))
                        .clamp(0.0, 1.0) as f32;
                    if coverage > 0.0 {
                        let i = ((y - mask.y0) * mask.width + (x - mask.x0)) as usize;
                        mask.data[i] = mask.data[i].max(coverage);
                    }
                }
            }
        }
        Some(mask)
    }

    fn for_each(&self, mut f: impl FnMut(u32, u32, f32)) {
        for row in 0..self.height {
            for col in 0..self.width {
                let coverage = self.data[(row * self.width + col) as usize];
                if coverage > 0.0 {
                    f(self.x0 + col, self.y0 + row, coverage);
                }
            }
        }
    }
}

/// Integer pixel range `[x0, x1) x [y0, y1)` of `rect` inside the target.
fn clip_to(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite())
    {
        return None;
    }
    let x0 = rect.x0.floor().clamp(0.0, width as f64) as u32;
    let y0 = rect.y0.floor().clamp(0.0, height as f64) as u32;
    let x1 = rect.x1.ceil().clamp(0.0, width as f64) as u32;
    let y1 = rect.y1.ceil().clamp(0.0, height as f64) as u32;
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Software rasterizer writing straight into RGBA buffers.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    tolerance: f64,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Flatten a path into line segments. Lone move-tos become zero-length
    /// segments so they render as dots.
    fn segments(&self, path: &BezPath) -> Vec<(Point, Point)> {
        let mut segments = Vec::new();
        let mut current: Option<Point> = None;
        let mut subpath_start = Point::ZERO;
        let mut lone: Option<Point> = None;
        kurbo::flatten(path, self.tolerance, |el| match el {
            PathEl::MoveTo(p) => {
                if let Some(dot) = lone.take() {
                    segments.push((dot, dot));
                }
                current = Some(p);
                subpath_start = p;
                lone = Some(p);
            }
            PathEl::LineTo(p) => {
                if let Some(from) = current {
                    segments.push((from, p));
                }
                current = Some(p);
                lone = None;
            }
            PathEl::ClosePath => {
                if let Some(from) = current {
                    if from != subpath_start {
                        segments.push((from, subpath_start));
                    }
                }
                current = Some(subpath_start);
                lone = None;
            }
            // flatten only emits lines
            PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
        });
        if let Some(dot) = lone {
            segments.push((dot, dot));
        }
        segments
    }
}

impl Renderer for SoftwareRenderer {
    fn stroke_path(&self, target: &mut RasterBuffer, path: &BezPath, brush: &Brush) {
        let segments = self.segments(path);
        let Some(mask) = CoverageMask::from_segments(
            &segments,
            brush.width.max(0.0) / 2.0,
            target.width(),
            target.height(),
        ) else {
            return;
        };
        match brush.mode {
            BrushMode::Paint => {
                mask.for_each(|x, y, c| target.blend_pixel(x, y, brush.color, c));
            }
            BrushMode::Erase => mask.for_each(|x, y, c| target.erase_pixel(x, y, c)),
        }
    }

    fn flatten(&self, surface: &Surface, dark_mode: bool) -> RasterBuffer {
        let ink = surface.ink();
        let Some(mut flat) =
            render_background(surface.background(), dark_mode, ink.width(), ink.height())
        else {
            return ink.clone();
        };
        for y in 0..ink.height() {
            for x in 0..ink.width() {
                if let Some([r, g, b, a]) = ink.pixel(x, y) {
                    if a > 0 {
                        flat.blend_pixel(x, y, InkColor::new(r, g, b, 255), a as f32 / 255.0);
                    }
                }
            }
        }
        flat
    }
}
