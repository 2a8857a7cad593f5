//! Pointer gesture state.

use kurbo::{Point, Vec2};
use mathink_core::recognize::ShapeClassification;
use mathink_core::schedule::TaskId;
use mathink_core::shapes::StrokeSample;

/// What the primary button draws without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    /// Clears ink under the stroke.
    Eraser,
}

/// The shape a sketch currently snaps to, and where it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingShape {
    pub anchor: Point,
    pub classification: ShapeClassification,
}

/// The active gesture. Each variant owns the samples and tasks it needs.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging the view. `last` is in screen coordinates.
    Panning { last: Point },
    /// Painting a live stroke. `last` is the previous surface point.
    FreehandDrawing { last: Point },
    ShapeSketching {
        sample: StrokeSample,
        pending: PendingShape,
        preview_task: Option<TaskId>,
    },
    ScratchErasing { sample: StrokeSample },
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning { .. } => "panning",
            Gesture::FreehandDrawing { .. } => "freehand",
            Gesture::ShapeSketching { .. } => "shape sketch",
            Gesture::ScratchErasing { .. } => "scratch erase",
        }
    }

    /// Shift the surface points held by the gesture.
    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Gesture::Idle | Gesture::Panning { .. } => {}
            Gesture::FreehandDrawing { last } => *last += offset,
            Gesture::ShapeSketching {
                sample, pending, ..
            } => {
                sample.translate(offset);
                pending.anchor += offset;
            }
            Gesture::ScratchErasing { sample } => sample.translate(offset),
        }
    }
}
