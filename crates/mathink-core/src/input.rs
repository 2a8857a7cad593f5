//! Pointer and modifier input types.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Only Ctrl held.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Only Alt held.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Decide which gesture a pointer-down with these modifiers starts.
    ///
    /// Shift wins over the drawing modifiers so panning never mixes with drawing.
    pub fn gesture_intent(self) -> GestureIntent {
        if self.shift {
            GestureIntent::Pan
        } else if self.alt {
            GestureIntent::ShapeSketch
        } else if self.ctrl {
            GestureIntent::ScratchErase
        } else {
            GestureIntent::Freehand
        }
    }
}

/// What a pointer-down asks the board to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureIntent {
    /// Drag the view.
    Pan,
    /// Draw a live freehand stroke.
    Freehand,
    /// Sketch a rough shape that gets snapped to a primitive.
    ShapeSketch,
    /// Scratch over ink or results to remove them.
    ScratchErase,
}

/// Pointer event in screen coordinates (relative to the board's viewport).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// The pointer left the viewport.
    Leave {
        position: Point,
    },
}

impl PointerEvent {
    /// Primary-button press with the given modifiers.
    pub fn down(position: Point, modifiers: Modifiers) -> Self {
        Self::Down {
            position,
            button: MouseButton::Left,
            modifiers,
        }
    }

    /// Primary-button release.
    pub fn up(position: Point) -> Self {
        Self::Up {
            position,
            button: MouseButton::Left,
        }
    }

    /// Pointer motion.
    pub fn moved(position: Point) -> Self {
        Self::Move { position }
    }

    /// Screen position carried by the event.
    pub fn position(&self) -> Point {
        match self {
            Self::Down { position, .. }
            | Self::Up { position, .. }
            | Self::Move { position }
            | Self::Leave { position } => *position,
        }
    }
}
