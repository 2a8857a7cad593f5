//! MathInk Board
//!
//! The board state machine: pointer gestures, shape sketching, scratch
//! erasing, the solver and OCR flows, and keyboard shortcuts. Hosts feed
//! it events and the current time, and draw its surface and overlay.

mod board;
mod flows;
mod gesture;
mod notice;
mod overlay;
mod shortcuts;

pub use board::{Board, BoardTask, DEFAULT_ANCHOR};
pub use flows::RecognitionRequest;
pub use gesture::{Gesture, PendingShape, ToolKind};
pub use notice::{Notice, NoticeKind};
pub use overlay::{Highlight, Overlay};
pub use shortcuts::{Action, Shortcut, ShortcutRegistry};
