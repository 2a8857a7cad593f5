//! MathInk Core Library
//!
//! Platform-agnostic core of the MathInk whiteboard: the freehand shape
//! classifier, the growable raster surface with its undo history, and the
//! seams to the OCR, solver and persistence collaborators.

pub mod calculations;
pub mod camera;
pub mod config;
pub mod expansion;
pub mod history;
pub mod input;
pub mod recognize;
pub mod results;
pub mod schedule;
pub mod services;
pub mod shapes;
pub mod storage;
pub mod surface;

pub use calculations::{Calculation, CalculationLog};
pub use camera::Camera;
pub use config::{BoardConfig, ConfigError};
pub use expansion::{ExpansionError, ExpansionLimits, ExpansionResult, plan_expansion};
pub use history::History;
pub use input::{GestureIntent, Modifiers, MouseButton, PointerEvent};
pub use recognize::{ShapeClassification, classify};
pub use results::{PlacedResult, ResultBoard, ResultId};
pub use schedule::{Scheduler, TaskId};
pub use services::{
    BoxFuture, MarkupConverter, OcrEngine, ServiceError, SolveRequest, Solver, SolverEntry,
};
pub use shapes::{Background, Brush, BrushMode, InkColor, Primitive, StrokeSample};
pub use storage::{CalculationStore, StorageError};
pub use surface::{RasterBuffer, Surface, SurfaceGeometry, SurfaceSnapshot};
