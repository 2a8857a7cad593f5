//! Geometric primitives committed by shape sketching.

use crate::recognize::ShapeClassification;
use kurbo::{BezPath, Circle, Point, Rect, Shape, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance used when converting curved primitives to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// A primitive built from a classification and the gesture's start/end anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line { start: Point, end: Point },
    /// Axis-aligned rectangle with corners at the two anchors.
    Rectangle { rect: Rect },
    /// Circle through both anchors: centered on their midpoint.
    Circle { center: Point, radius: f64 },
    /// Isosceles triangle with its apex at the start anchor.
    Triangle {
        apex: Point,
        base_right: Point,
        base_left: Point,
    },
}

impl Primitive {
    /// Build the primitive for `kind` spanning `start` to `end`.
    ///
    /// Returns `None` for [`ShapeClassification::None`].
    pub fn from_classification(kind: ShapeClassification, start: Point, end: Point) -> Option<Self> {
        match kind {
            ShapeClassification::Line => Some(Primitive::Line { start, end }),
            ShapeClassification::Rectangle => Some(Primitive::Rectangle {
                rect: Rect::from_points(start, end),
            }),
            ShapeClassification::Circle => Some(Primitive::Circle {
                center: start.midpoint(end),
                radius: start.distance(end) / 2.0,
            }),
            ShapeClassification::Triangle => Some(Primitive::Triangle {
                apex: start,
                base_right: end,
                base_left: Point::new(start.x - (end.x - start.x), end.y),
            }),
            ShapeClassification::None => None,
        }
    }

    /// The classification this primitive was built from.
    pub fn kind(&self) -> ShapeClassification {
        match self {
            Primitive::Line { .. } => ShapeClassification::Line,
            Primitive::Rectangle { .. } => ShapeClassification::Rectangle,
            Primitive::Circle { .. } => ShapeClassification::Circle,
            Primitive::Triangle { .. } => ShapeClassification::Triangle,
        }
    }

    /// Outline path used for rasterization.
    pub fn to_path(&self) -> BezPath {
        match *self {
            Primitive::Line { start, end } => {
                let mut path = BezPath::new();
                path.move_to(start);
                path.line_to(end);
                path
            }
            Primitive::Rectangle { rect } => rect.to_path(PATH_TOLERANCE),
            Primitive::Circle { center, radius } => {
                Circle::new(center, radius).to_path(PATH_TOLERANCE)
            }
            Primitive::Triangle {
                apex,
                base_right,
                base_left,
            } => {
                let mut path = BezPath::new();
                path.move_to(apex);
                path.line_to(base_right);
                path.line_to(base_left);
                path.close_path();
                path
            }
        }
    }

    /// Bounding box of the outline (without stroke width).
    pub fn bounds(&self) -> Rect {
        match *self {
            Primitive::Line { start, end } => Rect::from_points(start, end),
            Primitive::Rectangle { rect } => rect,
            Primitive::Circle { center, radius } => {
                Rect::from_center_size(center, (radius * 2.0, radius * 2.0))
            }
            Primitive::Triangle {
                apex,
                base_right,
                base_left,
            } => Rect::from_points(apex, base_right).union_pt(base_left),
        }
    }

    /// Shift the primitive, used when the surface grows before its origin.
    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Primitive::Line { start, end } => {
                *start += offset;
                *end += offset;
            }
            Primitive::Rectangle { rect } => *rect = *rect + offset,
            Primitive::Circle { center, .. } => *center += offset,
            Primitive::Triangle {
                apex,
                base_right,
                base_left,
            } => {
                *apex += offset;
                *base_right += offset;
                *base_left += offset;
            }
        }
    }
}
