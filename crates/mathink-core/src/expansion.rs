//! Growth of the surface when the pointer nears its edges.

use crate::surface::SurfaceGeometry;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound for either surface dimension, in pixels.
pub const MAX_SURFACE_DIMENSION: u32 = 50_000;

/// Expansion errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error("Surface would grow to {width}x{height}, over the {max}px limit")]
    LimitExceeded { width: u64, height: u64, max: u32 },
}

/// Tuning for edge buffers and the size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionLimits {
    /// Buffer as a fraction of the dimension it guards.
    pub buffer_fraction: f64,
    pub min_buffer: f64,
    pub max_buffer: f64,
    pub max_dimension: u32,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            buffer_fraction: 0.10,
            min_buffer: 50.0,
            max_buffer: 200.0,
            max_dimension: MAX_SURFACE_DIMENSION,
        }
    }
}

impl ExpansionLimits {
    /// Edge buffer for a dimension, rounded to whole pixels.
    ///
    /// `max_buffer` wins if the bounds are inverted.
    pub fn buffer_for(&self, size: u32) -> u32 {
        (size as f64 * self.buffer_fraction)
            .max(self.min_buffer)
            .min(self.max_buffer)
            .round() as u32
    }

    /// Check that the bounds are usable.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.buffer_fraction.is_finite() && self.buffer_fraction >= 0.0) {
            return Err(format!("buffer_fraction {} is not a non-negative number", self.buffer_fraction));
        }
        if !(self.min_buffer >= 0.0 && self.min_buffer <= self.max_buffer) {
            return Err(format!(
                "buffer range {}..{} is empty or negative",
                self.min_buffer, self.max_buffer
            ));
        }
        if self.max_dimension == 0 {
            return Err("max_dimension must be positive".to_string());
        }
        Ok(())
    }
}

/// Outcome of an expansion check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionResult {
    pub expanded: bool,
    /// Geometry after growth, with the pan compensated.
    pub geometry: SurfaceGeometry,
    /// Where old content lands in the new surface.
    pub content_offset: Vec2,
}

impl ExpansionResult {
    fn unchanged(geometry: SurfaceGeometry) -> Self {
        Self {
            expanded: false,
            geometry,
            content_offset: Vec2::ZERO,
        }
    }
}

struct AxisGrowth {
    size: u64,
    offset: u64,
}

/// Growth along one axis. The near edge wins when a point is inside both buffers.
fn grow_axis(coord: f64, size: u32, buffer: u32) -> AxisGrowth {
    let size_f = size as f64;
    let buffer_f = buffer as f64;
    let grown = size as u64 + 2 * buffer as u64;
    if coord < buffer_f {
        AxisGrowth {
            size: grown,
            offset: 2 * buffer as u64,
        }
    } else if coord > size_f - buffer_f {
        AxisGrowth {
            size: grown,
            offset: 0,
        }
    } else {
        AxisGrowth {
            size: size as u64,
            offset: 0,
        }
    }
}

/// Decide whether the surface must grow for a pointer at `point` (surface
/// coordinates).
///
/// Growth is all-or-nothing: when either new dimension would exceed
/// `limits.max_dimension` the whole expansion is refused.
pub fn plan_expansion(
    point: Point,
    geometry: &SurfaceGeometry,
    limits: &ExpansionLimits,
) -> Result<ExpansionResult, ExpansionError> {
    let x = grow_axis(point.x, geometry.width, limits.buffer_for(geometry.width));
    let y = grow_axis(point.y, geometry.height, limits.buffer_for(geometry.height));

    if x.size == geometry.width as u64 && y.size == geometry.height as u64 {
        return Ok(ExpansionResult::unchanged(*geometry));
    }

    let max = limits.max_dimension as u64;
    if x.size > max || y.size > max {
        log::warn!(
            "Refusing to grow surface to {}x{} (limit {}px)",
            x.size,
            y.size,
            limits.max_dimension
        );
        return Err(ExpansionError::LimitExceeded {
            width: x.size,
            height: y.size,
            max: limits.max_dimension,
        });
    }

    let content_offset = Vec2::new(x.offset as f64, y.offset as f64);
    // Screen = pan + surface * zoom, so old content keeps its screen position
    // when the pan moves back by the offset.
    let geometry = SurfaceGeometry {
        width: x.size as u32,
        height: y.size as u32,
        pan: geometry.pan - content_offset * geometry.zoom,
        zoom: geometry.zoom,
    };
    log::debug!(
        "Surface grown to {}x{}, content offset {:?}",
        geometry.width,
        geometry.height,
        content_offset
    );

    Ok(ExpansionResult {
        expanded: true,
        geometry,
        content_offset,
    })
}
