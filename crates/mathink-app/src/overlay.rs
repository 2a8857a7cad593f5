//! Transient marks drawn above the surface: the shape preview, the sketch
//! trail and scratch highlights.

use kurbo::{Point, Vec2};
use mathink_core::schedule::TaskId;
use mathink_core::shapes::{Brush, InkColor, Primitive};
use mathink_core::surface::RasterBuffer;
use mathink_render::Renderer;

/// A scratch highlight segment, removed when its task fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub task: TaskId,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Default)]
pub struct Overlay {
    preview: Option<Primitive>,
    trail: Vec<Point>,
    highlights: Vec<Highlight>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preview(&self) -> Option<&Primitive> {
        self.preview.as_ref()
    }

    pub fn set_preview(&mut self, preview: Option<Primitive>) {
        self.preview = preview;
    }

    /// Points of the shape sketch in progress.
    pub fn trail(&self) -> &[Point] {
        &self.trail
    }

    pub fn set_trail(&mut self, trail: &[Point]) {
        self.trail.clear();
        self.trail.extend_from_slice(trail);
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn add_highlight(&mut self, highlight: Highlight) {
        self.highlights.push(highlight);
    }

    /// Drop the highlight owned by `task`. Returns false if it was already gone.
    pub fn remove_highlight(&mut self, task: TaskId) -> bool {
        let before = self.highlights.len();
        self.highlights.retain(|h| h.task != task);
        self.highlights.len() != before
    }

    /// Clear the sketch marks, keeping highlights until they expire.
    pub fn clear_sketch(&mut self) {
        self.preview = None;
        self.trail.clear();
    }

    pub fn clear(&mut self) {
        self.clear_sketch();
        self.highlights.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.preview.is_none() && self.trail.is_empty() && self.highlights.is_empty()
    }

    pub fn translate(&mut self, offset: Vec2) {
        if let Some(preview) = &mut self.preview {
            preview.translate(offset);
        }
        for point in &mut self.trail {
            *point += offset;
        }
        for highlight in &mut self.highlights {
            highlight.from += offset;
            highlight.to += offset;
        }
    }

    /// Rasterize the overlay at surface size.
    pub fn render(
        &self,
        renderer: &impl Renderer,
        width: u32,
        height: u32,
        brush: &Brush,
    ) -> RasterBuffer {
        let mut raster = RasterBuffer::new(width, height);
        if !self.trail.is_empty() {
            let trail_brush = Brush::new(
                InkColor {
                    a: brush.color.a / 2,
                    ..brush.color
                },
                brush.width,
            );
            renderer.stroke_points(&mut raster, &self.trail, &trail_brush);
        }
        if let Some(preview) = &self.preview {
            renderer.stroke_path(&mut raster, &preview.to_path(), brush);
        }
        let highlight = Brush::new(InkColor::SCRATCH_HIGHLIGHT, brush.width * 2.0);
        for h in &self.highlights {
            renderer.stroke_segment(&mut raster, h.from, h.to, &highlight);
        }
        raster
    }
}
