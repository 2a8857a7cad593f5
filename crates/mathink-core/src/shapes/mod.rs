//! Ink colors, brushes and the primitives a sketch can snap to.

mod primitive;
mod stroke;

pub use primitive::Primitive;
pub use stroke::StrokeSample;

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8, straight alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl InkColor {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Pattern stroke color for grid and dot backgrounds.
    pub const GRAY: Self = Self::new(128, 128, 128, 255);
    /// Board fill used behind patterns in dark mode.
    pub const DARK_BOARD: Self = Self::new(0x1a, 0x1a, 0x1a, 255);
    /// Translucent red used for the scratch-erase highlight.
    pub const SCRATCH_HIGHLIGHT: Self = Self::new(255, 0, 0, 77);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex string.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Pixel bytes in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for InkColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<InkColor> for Color {
    fn from(color: InkColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Whether a brush deposits ink or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushMode {
    #[default]
    Paint,
    Erase,
}

/// Stroke settings used when rasterizing ink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: InkColor,
    /// Stroke width in surface pixels.
    pub width: f64,
    pub mode: BrushMode,
}

impl Brush {
    pub fn new(color: InkColor, width: f64) -> Self {
        Self {
            color,
            width,
            mode: BrushMode::Paint,
        }
    }

    /// An eraser of the given width.
    pub fn eraser(width: f64) -> Self {
        Self {
            color: InkColor::TRANSPARENT,
            width,
            mode: BrushMode::Erase,
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(InkColor::BLACK, 3.0)
    }
}

/// Board background. Patterns are painted over an opaque board fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Background {
    #[default]
    Transparent,
    Color(InkColor),
    /// 20px grid of gray hairlines.
    Grid,
    /// Gray dot in the middle of every 10px cell.
    Dots,
}

impl Background {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Background::Transparent => "Transparent",
            Background::Color(c) if c == InkColor::WHITE => "White",
            Background::Color(c) if c == InkColor::new(0xf0, 0xf0, 0xf0, 255) => "Light Gray",
            Background::Color(_) => "Color",
            Background::Grid => "Grid",
            Background::Dots => "Dots",
        }
    }

    /// Whether the background is rendered into exported rasters.
    pub fn is_pattern(self) -> bool {
        matches!(self, Background::Grid | Background::Dots)
    }

    /// The preset backgrounds offered by the board.
    pub fn presets() -> [Background; 5] {
        [
            Background::Transparent,
            Background::Color(InkColor::WHITE),
            Background::Color(InkColor::new(0xf0, 0xf0, 0xf0, 255)),
            Background::Grid,
            Background::Dots,
        ]
    }
}
