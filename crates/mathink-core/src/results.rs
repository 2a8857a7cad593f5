//! Typeset results placed on the board.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a placed result.
pub type ResultId = Uuid;

/// Markup for a solver answer, shown as a large inline equation.
pub fn solution_markup(expr: &str, result: &str) -> String {
    format!("\\(\\LARGE{{{expr} = {result}}}\\)")
}

/// Markup used when text-to-markup conversion fails: dollar delimiters
/// are stripped and the text is wrapped as inline math.
pub fn fallback_markup(text: &str) -> String {
    format!("\\({}\\)", text.replace('$', ""))
}

/// A rendered result positioned on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedResult {
    pub id: ResultId,
    pub markup: String,
    /// Top-left corner in surface coordinates.
    pub position: Point,
    /// Font size in pixels.
    pub font_size: f64,
    /// Size reported by the host after typesetting.
    #[serde(default)]
    pub measured: Option<Size>,
}

impl PlacedResult {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    pub fn new(markup: String, position: Point, font_size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            markup,
            position,
            font_size,
            measured: None,
        }
    }

    /// Measured size, or an estimate from the markup length.
    pub fn size(&self) -> Size {
        self.measured.unwrap_or_else(|| {
            Size::new(
                self.markup.chars().count() as f64 * self.font_size * 0.5,
                self.font_size * 1.3,
            )
        })
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    /// Whether any of `points` falls inside the bounding box.
    pub fn touched_by(&self, points: &[Point]) -> bool {
        let bounds = self.bounds();
        points.iter().any(|p| bounds.contains(*p))
    }
}

/// Every result currently on the board, in placement order.
#[derive(Debug, Clone, Default)]
pub struct ResultBoard {
    results: Vec<PlacedResult>,
}

impl ResultBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place new markup and return its id.
    pub fn place(&mut self, markup: String, position: Point, font_size: f64) -> ResultId {
        let result = PlacedResult::new(markup, position, font_size);
        let id = result.id;
        self.results.push(result);
        id
    }

    pub fn get(&self, id: ResultId) -> Option<&PlacedResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: ResultId) -> Option<&mut PlacedResult> {
        self.results.iter_mut().find(|r| r.id == id)
    }

    /// Move a result. Returns false for an unknown id.
    pub fn move_to(&mut self, id: ResultId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(result) => {
                result.position = position;
                true
            }
            None => false,
        }
    }

    /// Record the host-measured size of a result.
    pub fn set_size(&mut self, id: ResultId, size: Size) -> bool {
        match self.get_mut(id) {
            Some(result) => {
                result.measured = Some(size);
                true
            }
            None => false,
        }
    }

    /// Remove every result whose bounds contain one of `points`.
    /// Returns the removed ids.
    pub fn remove_touched(&mut self, points: &[Point]) -> Vec<ResultId> {
        let mut removed = Vec::new();
        self.results.retain(|r| {
            let hit = r.touched_by(points);
            if hit {
                removed.push(r.id);
            }
            !hit
        });
        removed
    }

    /// Shift all results, used when the surface grows before its origin.
    pub fn translate_all(&mut self, offset: Vec2) {
        for result in &mut self.results {
            result.position += offset;
        }
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[PlacedResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_markup() {
        assert_eq!(solution_markup("2+2", "4"), r"\(\LARGE{2+2 = 4}\)");
    }

    #[test]
    fn test_fallback_markup_strips_dollars() {
        assert_eq!(fallback_markup("$x^2$ + 1"), r"\(x^2 + 1\)");
        assert_eq!(fallback_markup(""), r"\(\)");
    }

    #[test]
    fn test_estimated_bounds() {
        let result = PlacedResult::new("abcd".to_string(), Point::new(10.0, 20.0), 20.0);
        let bounds = result.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 40.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_measured_size_wins() {
        let mut board = ResultBoard::new();
        let id = board.place("x".to_string(), Point::ZERO, 20.0);
        assert!(board.set_size(id, Size::new(100.0, 50.0)));
        assert_eq!(board.get(id).map(|r| r.bounds()), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
    }

    #[test]
    fn test_remove_touched() {
        let mut board = ResultBoard::new();
        let a = board.place("aaaa".to_string(), Point::new(0.0, 0.0), 20.0);
        let b = board.place("bbbb".to_string(), Point::new(200.0, 0.0), 20.0);

        let removed = board.remove_touched(&[Point::new(500.0, 500.0), Point::new(5.0, 5.0)]);
        assert_eq!(removed, vec![a]);
        assert_eq!(board.len(), 1);
        assert!(board.get(b).is_some());
    }

    #[test]
    fn test_move_and_translate() {
        let mut board = ResultBoard::new();
        let id = board.place("x".to_string(), Point::new(1.0, 1.0), 20.0);
        assert!(board.move_to(id, Point::new(50.0, 60.0)));
        assert!(!board.move_to(Uuid::new_v4(), Point::ZERO));

        board.translate_all(Vec2::new(100.0, 0.0));
        assert_eq!(board.get(id).map(|r| r.position), Some(Point::new(150.0, 60.0)));
    }
}
