//! View transform between the viewport and the drawing surface.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%".
pub const BASE_ZOOM: f64 = 1.0;

pub const MIN_ZOOM: f64 = 0.5;

pub const MAX_ZOOM: f64 = 3.0;

/// Pan and zoom of the surface inside the viewport.
///
/// The surface's top-left corner sits at `offset` on screen and the surface
/// is scaled about that corner, so surface point `p` is drawn at
/// `offset + p * zoom`. Growing the surface to the left or top moves its
/// corner, which [`Camera::follow_content`] compensates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the surface origin.
    pub offset: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::with_zoom_range(MIN_ZOOM, MAX_ZOOM)
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera at the origin with custom zoom bounds. Inverted bounds are swapped.
    pub fn with_zoom_range(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: BASE_ZOOM,
            min_zoom: min_zoom.min(max_zoom),
            max_zoom: max_zoom.max(min_zoom),
        }
    }

    /// Surface-to-screen transform, for hosts placing the surface raster.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Map a pointer position to surface pixels.
    pub fn screen_to_surface(&self, screen: Point) -> Point {
        let local = screen - self.offset;
        Point::new(local.x / self.zoom, local.y / self.zoom)
    }

    pub fn surface_to_screen(&self, surface: Point) -> Point {
        self.transform() * surface
    }

    /// Drag the surface by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Keep content in place on screen after it moved by `content_offset`
    /// surface pixels.
    pub fn follow_content(&mut self, content_offset: Vec2) {
        self.offset -= content_offset * self.zoom;
    }

    /// Step the zoom by `delta`. Returns true if the zoom changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    /// Set the zoom, clamped to `[min_zoom, max_zoom]`. The surface origin
    /// stays where it is on screen.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let clamped = zoom.max(self.min_zoom).min(self.max_zoom);
        if !clamped.is_finite() || clamped <= 0.0 {
            return false;
        }
        if (clamped - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = clamped;
        true
    }

    /// Back to no pan at 100%.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = BASE_ZOOM;
    }
}
