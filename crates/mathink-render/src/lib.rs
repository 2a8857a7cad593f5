//! MathInk Render Library
//!
//! Rasterizes ink into the board's surface and produces the images sent to
//! the OCR engine and the solver.

pub mod export;
pub mod pattern;
mod raster_impl;
mod renderer;

pub use export::{encode_png, png_data_uri, prepare_for_ocr};
pub use pattern::render_background;
pub use raster_impl::SoftwareRenderer;
pub use renderer::{RenderResult, Renderer, RendererError};
