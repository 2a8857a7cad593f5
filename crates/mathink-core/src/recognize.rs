//! Freehand shape recognition.
//!
//! A sketch is classified by a fixed cascade of coarse heuristics evaluated
//! in order: line, rectangle, circle, triangle. The first heuristic that
//! accepts the sketch wins, so a straight stroke is always a line even when
//! its end points would also pass the rectangle test.
//!
//! The thresholds are part of the board's observable behavior and are kept
//! exactly as users know them.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum deviation (degrees) of any segment from the overall stroke bearing for a line.
pub const LINE_TOLERANCE_DEG: f64 = 15.0;
/// Minimum horizontal and vertical extent (pixels) for a rectangle.
pub const MIN_RECTANGLE_EXTENT: f64 = 20.0;
/// Allowed difference between width and height, relative to the larger side.
pub const RECTANGLE_ASPECT_TOLERANCE: f64 = 0.2;
/// Allowed deviation of interior points from the circle radius, relative to the radius.
pub const CIRCLE_RADIUS_TOLERANCE: f64 = 0.2;
/// Open interval (degrees) of turn angles that count as a triangle corner.
pub const TRIANGLE_TURN_RANGE_DEG: (f64, f64) = (45.0, 135.0);

/// Fewer samples than this never match anything.
const MIN_SAMPLES: usize = 3;
/// Rectangles and triangles need at least this many samples.
const MIN_POLYGON_SAMPLES: usize = 4;
/// Vectors shorter than this have no direction.
const ZERO_LENGTH: f64 = 1e-9;

/// Result of classifying a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeClassification {
    Line,
    Rectangle,
    Circle,
    Triangle,
    #[default]
    None,
}

impl ShapeClassification {
    /// Whether a primitive was recognized.
    pub fn is_match(self) -> bool {
        self != ShapeClassification::None
    }

    /// Lowercase name, as shown in previews.
    pub fn name(self) -> &'static str {
        match self {
            ShapeClassification::Line => "line",
            ShapeClassification::Rectangle => "rectangle",
            ShapeClassification::Circle => "circle",
            ShapeClassification::Triangle => "triangle",
            ShapeClassification::None => "none",
        }
    }
}

impl fmt::Display for ShapeClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an ordered sketch. The first and last points are the anchors.
pub fn classify(points: &[Point]) -> ShapeClassification {
    let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
        return ShapeClassification::None;
    };
    if points.len() < MIN_SAMPLES {
        return ShapeClassification::None;
    }

    if is_line(points, start, end) {
        ShapeClassification::Line
    } else if is_rectangle(points, start, end) {
        ShapeClassification::Rectangle
    } else if is_circle(points, start, end) {
        ShapeClassification::Circle
    } else if is_triangle(points) {
        ShapeClassification::Triangle
    } else {
        ShapeClassification::None
    }
}

/// Bearing of `v` in degrees, or `None` for a zero-length vector.
fn bearing(v: Vec2) -> Option<f64> {
    if v.hypot() < ZERO_LENGTH {
        None
    } else {
        Some(v.atan2().to_degrees())
    }
}

/// Absolute difference between two bearings, wrapped into `[0, 180]`.
fn angular_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}

fn is_line(points: &[Point], start: Point, end: Point) -> bool {
    let Some(angle0) = bearing(end - start) else {
        return false;
    };
    points.windows(2).all(|pair| match bearing(pair[1] - pair[0]) {
        Some(angle) => angular_difference(angle, angle0) < LINE_TOLERANCE_DEG,
        None => true,
    })
}

fn is_rectangle(points: &[Point], start: Point, end: Point) -> bool {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    points.len() >= MIN_POLYGON_SAMPLES
        && dx > MIN_RECTANGLE_EXTENT
        && dy > MIN_RECTANGLE_EXTENT
        && (dx - dy).abs() < dx.max(dy) * RECTANGLE_ASPECT_TOLERANCE
}

fn is_circle(points: &[Point], start: Point, end: Point) -> bool {
    let center = start.midpoint(end);
    let radius = start.distance(end) / 2.0;
    if radius < ZERO_LENGTH {
        return false;
    }
    let interior = &points[1..points.len() - 1];
    interior
        .iter()
        .all(|p| (p.distance(center) - radius).abs() < radius * CIRCLE_RADIUS_TOLERANCE)
}

fn is_triangle(points: &[Point]) -> bool {
    if points.len() < MIN_POLYGON_SAMPLES {
        return false;
    }
    let (low, high) = TRIANGLE_TURN_RANGE_DEG;
    (2..points.len() - 1).any(|i| {
        let vertex = points[i];
        match (bearing(points[i + 1] - vertex), bearing(points[i - 1] - vertex)) {
            (Some(next), Some(prev)) => {
                let turn = angular_difference(next, prev);
                turn > low && turn < high
            }
            _ => false,
        }
    })
}
