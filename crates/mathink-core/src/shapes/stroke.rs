//! Ordered pointer samples captured during one gesture.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A stroke sample: surface points in the order they were recorded.
///
/// Consecutive duplicates are kept; temporal order matters to the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSample {
    points: Vec<Point>,
}

impl StrokeSample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sample at `point`.
    pub fn starting_at(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Append a point.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// All points in recording order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// First recorded point (the start anchor).
    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Most recent point (the end anchor).
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shift every point, used when the surface grows before its origin.
    pub fn translate(&mut self, offset: Vec2) {
        for point in &mut self.points {
            *point += offset;
        }
    }

    /// Axis-aligned bounds of the sample.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(first, first), |rect, p| rect.union_pt(*p))
    }

    /// Consume the sample, returning the recorded points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}
