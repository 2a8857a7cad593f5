//! Solver and handwriting-recognition flows.
//!
//! Each flow is split into a `begin_*` step that captures the request and a
//! `finish_*` step that applies the outcome, so hosts can run the collaborator
//! call however they like. The async helpers chain the two for hosts with an
//! executor.

use crate::board::{Board, BoardTask};
use crate::notice::NoticeKind;
use kurbo::Point;
use mathink_core::calculations::Calculation;
use mathink_core::results::{ResultId, fallback_markup, solution_markup};
use mathink_core::services::{
    MarkupConverter, OcrEngine, ServiceResult, SolveRequest, Solver, SolverEntry,
};
use mathink_render::{Renderer, encode_png, png_data_uri, prepare_for_ocr};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Image and language handed to the OCR engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionRequest {
    pub png: Vec<u8>,
    pub language: String,
}

impl Board {
    /// Capture the board for the solver.
    ///
    /// Returns `None` while a solve is already in flight or if the image
    /// could not be encoded.
    pub fn begin_solve(&mut self) -> Option<SolveRequest> {
        if self.solving {
            log::debug!("Solve already in flight");
            return None;
        }
        let flat = self.renderer.flatten(&self.surface, self.dark_mode);
        let png = match encode_png(&flat) {
            Ok(png) => png,
            Err(e) => {
                log::error!("Could not encode board for solver: {}", e);
                self.notify(NoticeKind::ExportFailed, e.to_string());
                return None;
            }
        };
        self.solving = true;
        Some(SolveRequest {
            image: png_data_uri(&png),
            dict_of_vars: self.variables.clone(),
        })
    }

    /// Apply a solver outcome. Results are placed one `result_stagger` apart,
    /// the first immediately. Returns the number of entries received.
    ///
    /// An outcome arriving with no solve in flight, as after [`Board::reset`],
    /// is dropped.
    pub fn finish_solve(&mut self, outcome: ServiceResult<Vec<SolverEntry>>, now: Instant) -> usize {
        if !self.solving {
            log::info!("Dropping solver outcome, no solve in flight");
            return 0;
        }
        self.solving = false;
        let entries = match outcome {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Solver failed: {}", e);
                self.notify(NoticeKind::SolverFailed, format!("Could not solve: {e}"));
                return 0;
            }
        };
        log::info!("Solver returned {} results", entries.len());

        self.anchor = self.placement_anchor();
        let stagger = self.config.result_stagger();
        let mut delay = std::time::Duration::ZERO;
        for entry in &entries {
            if entry.assign {
                self.variables.insert(entry.expr.clone(), entry.result.clone());
            }
            self.record_calculation(Calculation::new(entry.expr.as_str(), entry.result.as_str()));
            self.scheduler.schedule_after(
                now,
                delay,
                BoardTask::PlaceResult {
                    markup: solution_markup(&entry.expr, &entry.result),
                },
            );
            delay += stagger;
        }
        if !entries.is_empty() {
            self.persist_calculations();
        }
        self.tick(now);
        entries.len()
    }

    /// Center of the inked area, or of the surface when nothing is drawn.
    fn placement_anchor(&self) -> Point {
        match self.surface.ink().content_bounds() {
            Some(bounds) => bounds.center(),
            None => Point::new(
                self.surface.width() as f64 / 2.0,
                self.surface.height() as f64 / 2.0,
            ),
        }
    }

    /// Run a full solve against `solver`.
    pub async fn solve(&mut self, solver: &dyn Solver) -> usize {
        let Some(request) = self.begin_solve() else {
            return 0;
        };
        let outcome = solver.solve(request).await;
        self.finish_solve(outcome, Instant::now())
    }

    /// Capture the board for handwriting recognition. Dark boards are
    /// inverted so ink reads dark on light.
    pub fn begin_recognition(&mut self) -> Option<RecognitionRequest> {
        if self.recognizing {
            log::debug!("Recognition already in flight");
            return None;
        }
        let flat = self.renderer.flatten(&self.surface, self.dark_mode);
        let prepared = prepare_for_ocr(&flat, self.dark_mode);
        let png = match encode_png(&prepared) {
            Ok(png) => png,
            Err(e) => {
                log::error!("Could not encode board for recognition: {}", e);
                self.notify(NoticeKind::ExportFailed, e.to_string());
                return None;
            }
        };
        self.recognizing = true;
        Some(RecognitionRequest {
            png,
            language: self.config.ocr_language.clone(),
        })
    }

    /// Apply an OCR outcome. Returns the recognized text, if any.
    pub fn finish_recognition(&mut self, outcome: ServiceResult<String>) -> Option<String> {
        if !self.recognizing {
            log::info!("Dropping recognition outcome, no recognition in flight");
            return None;
        }
        self.recognizing = false;
        match outcome {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    log::info!("No text recognized");
                    return None;
                }
                log::info!("Recognized {} characters", text.chars().count());
                self.recognized_text = Some(text.to_string());
                Some(text.to_string())
            }
            Err(e) => {
                log::warn!("Text recognition failed: {}", e);
                self.notify(NoticeKind::RecognitionFailed, format!("Could not read handwriting: {e}"));
                None
            }
        }
    }

    /// Place converted markup for `text` at the anchor, falling back to the
    /// raw text when conversion failed.
    pub fn place_converted(&mut self, text: &str, outcome: ServiceResult<String>) -> ResultId {
        let markup = match outcome {
            Ok(markup) => markup,
            Err(e) => {
                log::warn!("Markup conversion failed, placing raw text: {}", e);
                self.notify(NoticeKind::MarkupFallback, format!("Showing raw text: {e}"));
                fallback_markup(text)
            }
        };
        self.place_markup(markup)
    }

    /// Recognize the handwriting on the board and place it as markup.
    pub async fn convert_handwriting(
        &mut self,
        ocr: &dyn OcrEngine,
        converter: &dyn MarkupConverter,
    ) -> Option<ResultId> {
        let request = self.begin_recognition()?;
        let outcome = ocr.recognize(request.png, &request.language).await;
        let text = self.finish_recognition(outcome)?;
        let markup = converter.to_markup(&text).await;
        Some(self.place_converted(&text, markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use mathink_core::config::BoardConfig;
    use mathink_core::services::ServiceError;
    use std::time::Duration;

    fn board() -> Board {
        Board::new(BoardConfig::default(), Size::new(400.0, 300.0))
    }

    fn entry(expr: &str, result: &str, assign: bool) -> SolverEntry {
        SolverEntry {
            expr: expr.to_string(),
            result: result.to_string(),
            assign,
        }
    }

    #[test]
    fn test_solve_is_exclusive() {
        let mut board = board();
        let request = board.begin_solve().unwrap();
        assert!(request.image.starts_with("data:image/png;base64,"));
        assert!(board.begin_solve().is_none());
        // Recognition is independent.
        assert!(board.begin_recognition().is_some());
        board.finish_solve(Ok(Vec::new()), Instant::now());
        assert!(!board.is_solving());
        assert!(board.is_recognizing());
    }

    #[test]
    fn test_results_are_staggered() {
        let mut board = board();
        let now = Instant::now();
        board.begin_solve();
        let count = board.finish_solve(
            Ok(vec![entry("x", "5", true), entry("x + 1", "6", false)]),
            now,
        );
        assert_eq!(count, 2);
        assert_eq!(board.results().len(), 1);
        // Blank board: anchored at the center.
        assert_eq!(board.anchor(), Point::new(200.0, 150.0));
        assert_eq!(board.results()[0].markup, r"\(\LARGE{x = 5}\)");

        board.tick(now + Duration::from_millis(999));
        assert_eq!(board.results().len(), 1);
        board.tick(now + Duration::from_millis(1000));
        assert_eq!(board.results().len(), 2);

        assert_eq!(board.variables().get("x").map(String::as_str), Some("5"));
        assert!(!board.variables().contains_key("x + 1"));
        assert_eq!(board.calculations().len(), 2);
    }

    #[test]
    fn test_solver_failure_leaves_state() {
        let mut board = board();
        board.begin_solve();
        let count = board.finish_solve(Err(ServiceError::Timeout), Instant::now());
        assert_eq!(count, 0);
        assert!(board.results().is_empty());
        assert_eq!(board.anchor(), crate::board::DEFAULT_ANCHOR);
        let notices = board.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::SolverFailed);
    }

    #[test]
    fn test_markup_fallback() {
        let mut board = board();
        let id = board.place_converted("$x^2$", Err(ServiceError::Unavailable("offline".into())));
        let placed = board.results().iter().find(|r| r.id == id).unwrap();
        assert_eq!(placed.markup, r"\(x^2\)");
        assert_eq!(placed.position, crate::board::DEFAULT_ANCHOR);
        assert_eq!(board.take_notices()[0].kind, NoticeKind::MarkupFallback);
    }

    #[test]
    fn test_outcome_after_reset_is_dropped() {
        let mut board = board();
        let now = Instant::now();
        assert!(board.begin_solve().is_some());
        assert!(board.begin_recognition().is_some());
        board.reset();
        assert!(!board.is_solving());
        assert!(!board.is_recognizing());

        let count = board.finish_solve(Ok(vec![entry("y", "3", true)]), now);
        assert_eq!(count, 0);
        board.tick(now + Duration::from_secs(5));
        assert!(board.results().is_empty());
        assert!(board.variables().is_empty());
        assert!(board.calculations().is_empty());
        assert_eq!(board.anchor(), crate::board::DEFAULT_ANCHOR);

        assert_eq!(board.finish_recognition(Ok("x + 1".to_string())), None);
        assert!(board.recognized_text().is_none());
        assert!(board.take_notices().is_empty());

        // A fresh solve after the reset goes through.
        assert!(board.begin_solve().is_some());
        assert_eq!(board.finish_solve(Ok(vec![entry("y", "3", true)]), now), 1);
        assert_eq!(board.results().len(), 1);
    }

    #[test]
    fn test_blank_recognition() {
        let mut board = board();
        board.begin_recognition();
        assert_eq!(board.finish_recognition(Ok("  \n".to_string())), None);
        assert!(board.recognized_text().is_none());
        assert!(!board.is_recognizing());
    }
}
