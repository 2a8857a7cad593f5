//! The board: application state and per-event transitions.

use crate::gesture::{Gesture, PendingShape, ToolKind};
use crate::notice::{Notice, NoticeKind};
use crate::overlay::{Highlight, Overlay};
use crate::shortcuts::{Action, ShortcutRegistry};
use kurbo::{Point, Size, Vec2};
use mathink_core::calculations::{Calculation, CalculationLog};
use mathink_core::camera::Camera;
use mathink_core::config::BoardConfig;
use mathink_core::expansion::plan_expansion;
use mathink_core::history::History;
use mathink_core::input::{GestureIntent, Modifiers, MouseButton, PointerEvent};
use mathink_core::recognize::{ShapeClassification, classify};
use mathink_core::results::{PlacedResult, ResultBoard, ResultId, solution_markup};
use mathink_core::schedule::{Scheduler, TaskId};
use mathink_core::services::Variables;
use mathink_core::shapes::{Background, Brush, InkColor, Primitive, StrokeSample};
use mathink_core::storage::{CalculationStore, StorageError};
use mathink_core::surface::{RasterBuffer, Surface, SurfaceGeometry};
use mathink_render::{RenderResult, Renderer, SoftwareRenderer, encode_png};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Where converted text lands before any solve has moved the anchor.
pub const DEFAULT_ANCHOR: Point = Point::new(10.0, 200.0);

/// Deferred work owned by the board or its current gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardTask {
    /// Snap the shape sketch to its classification.
    ShapePreview,
    /// Remove one scratch highlight segment.
    RevertHighlight,
    /// Place solver markup at the anchor.
    PlaceResult { markup: String },
}

/// Interactive whiteboard state.
pub struct Board {
    pub(crate) config: BoardConfig,
    viewport: Size,
    pub(crate) camera: Camera,
    pub(crate) surface: Surface,
    history: History,
    pub(crate) renderer: SoftwareRenderer,
    color: InkColor,
    line_width: f64,
    tool: ToolKind,
    pub(crate) dark_mode: bool,
    gesture: Gesture,
    overlay: Overlay,
    pub(crate) scheduler: Scheduler<BoardTask>,
    pub(crate) results: ResultBoard,
    pub(crate) variables: Variables,
    pub(crate) calculations: CalculationLog,
    store: Option<Box<dyn CalculationStore>>,
    /// Top-left of the next placed result.
    pub(crate) anchor: Point,
    pub(crate) recognized_text: Option<String>,
    history_panel_open: bool,
    pub(crate) solving: bool,
    pub(crate) recognizing: bool,
    /// Set once a refused expansion has been reported.
    limit_reported: bool,
    notices: Vec<Notice>,
}

fn surface_dims(viewport: Size) -> (u32, u32) {
    (
        viewport.width.ceil().max(1.0) as u32,
        viewport.height.ceil().max(1.0) as u32,
    )
}

impl Board {
    /// Create a blank board whose surface matches the viewport.
    pub fn new(config: BoardConfig, viewport: Size) -> Self {
        let (width, height) = surface_dims(viewport);
        let surface = Surface::new(width, height);
        let history = History::with_limit(surface.snapshot(), config.history_limit);
        Self {
            camera: Camera::with_zoom_range(config.min_zoom, config.max_zoom),
            line_width: config.line_width,
            calculations: CalculationLog::with_limit(config.calculation_limit),
            config,
            viewport,
            surface,
            history,
            renderer: SoftwareRenderer::new(),
            color: InkColor::BLACK,
            tool: ToolKind::Pen,
            dark_mode: false,
            gesture: Gesture::Idle,
            overlay: Overlay::new(),
            scheduler: Scheduler::new(),
            results: ResultBoard::new(),
            variables: Variables::new(),
            store: None,
            anchor: DEFAULT_ANCHOR,
            recognized_text: None,
            history_panel_open: false,
            solving: false,
            recognizing: false,
            limit_reported: false,
            notices: Vec::new(),
        }
    }

    /// Attach a calculation store and load the saved log from it.
    ///
    /// Missing or corrupt data leaves the log empty.
    pub fn with_store(mut self, store: Box<dyn CalculationStore>) -> Self {
        match store.load() {
            Ok(entries) => {
                log::info!("Loaded {} saved calculations", entries.len());
                self.calculations = CalculationLog::from_entries(entries, self.config.calculation_limit);
            }
            Err(StorageError::NotFound(_)) => {
                log::debug!("No saved calculations");
            }
            Err(e) => {
                log::warn!("Ignoring saved calculations: {}", e);
            }
        }
        self.store = Some(store);
        self
    }

    // --- Accessors ---

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn results(&self) -> &[PlacedResult] {
        self.results.as_slice()
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn calculations(&self) -> &CalculationLog {
        &self.calculations
    }

    pub fn recognized_text(&self) -> Option<&str> {
        self.recognized_text.as_deref()
    }

    pub fn clear_recognized_text(&mut self) {
        self.recognized_text = None;
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_history_panel_open(&self) -> bool {
        self.history_panel_open
    }

    pub fn toggle_history_panel(&mut self) {
        self.history_panel_open = !self.history_panel_open;
    }

    pub fn is_solving(&self) -> bool {
        self.solving
    }

    pub fn is_recognizing(&self) -> bool {
        self.recognizing
    }

    /// Current surface size and view.
    pub fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry {
            width: self.surface.width(),
            height: self.surface.height(),
            pan: self.camera.offset,
            zoom: self.camera.zoom,
        }
    }

    /// Earliest pending task deadline, for hosts that sleep between ticks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Drain the notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notices.push(Notice::new(kind, message));
    }

    // --- Brush and appearance ---

    pub fn set_color(&mut self, color: InkColor) {
        self.color = color;
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch dark mode. The brush color follows: white on dark, black on light.
    pub fn set_dark_mode(&mut self, dark: bool) {
        self.dark_mode = dark;
        self.color = if dark { InkColor::WHITE } else { InkColor::BLACK };
    }

    pub fn set_background(&mut self, background: Background) {
        self.surface.set_background(background);
    }

    pub fn background(&self) -> Background {
        self.surface.background()
    }

    /// Color the host paints behind the surface.
    pub fn board_color(&self) -> InkColor {
        match self.surface.background() {
            _ if self.dark_mode => InkColor::DARK_BOARD,
            Background::Color(color) => color,
            Background::Grid | Background::Dots => InkColor::WHITE,
            Background::Transparent => InkColor::TRANSPARENT,
        }
    }

    /// Brush for live freehand strokes, honoring the eraser tool.
    fn stroke_brush(&self) -> Brush {
        match self.tool {
            ToolKind::Pen => self.shape_brush(),
            ToolKind::Eraser => Brush::eraser(self.line_width),
        }
    }

    fn shape_brush(&self) -> Brush {
        Brush::new(self.color, self.line_width)
    }

    // --- View ---

    /// Step the zoom. Returns true if it changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        self.camera.zoom_by(delta)
    }

    /// Wheel input. Ctrl+wheel zooms by one step; plain scrolling is left to the host.
    pub fn handle_wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> bool {
        if !(modifiers.ctrl || modifiers.meta) || delta_y == 0.0 {
            return false;
        }
        let step = self.config.zoom_step;
        self.zoom_by(if delta_y > 0.0 { -step } else { step })
    }

    fn to_surface(&self, screen: Point) -> Point {
        self.camera.screen_to_surface(screen)
    }

    // --- Expansion ---

    /// Grow the surface if `point` is near an edge. Returns `point` in the
    /// (possibly shifted) surface coordinates.
    pub(crate) fn ensure_room(&mut self, point: Point) -> Point {
        let geometry = self.geometry();
        match plan_expansion(point, &geometry, &self.config.expansion) {
            Ok(result) if result.expanded => {
                self.surface.apply_expansion(&result);
                let offset = result.content_offset;
                self.camera.follow_content(offset);
                if offset != Vec2::ZERO {
                    self.gesture.translate(offset);
                    self.overlay.translate(offset);
                    self.results.translate_all(offset);
                    self.anchor += offset;
                }
                self.history.commit(self.surface.snapshot());
                self.limit_reported = false;
                point + offset
            }
            Ok(_) => point,
            Err(e) => {
                if !self.limit_reported {
                    self.limit_reported = true;
                    self.notify(NoticeKind::SurfaceLimit, e.to_string());
                }
                point
            }
        }
    }

    // --- Pointer ---

    /// Dispatch a pointer event given in viewport coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                if button == MouseButton::Left && !self.gesture.is_active() {
                    self.begin_gesture(position, modifiers.gesture_intent(), now);
                }
            }
            PointerEvent::Move { position } => self.continue_gesture(position, now),
            PointerEvent::Up { position, button } => {
                if button == MouseButton::Left {
                    self.end_gesture(position);
                }
            }
            PointerEvent::Leave { position } => self.end_gesture(position),
        }
    }

    fn begin_gesture(&mut self, screen: Point, intent: GestureIntent, now: Instant) {
        self.gesture = match intent {
            GestureIntent::Pan => Gesture::Panning { last: screen },
            GestureIntent::Freehand => Gesture::FreehandDrawing {
                last: self.ensure_room(self.to_surface(screen)),
            },
            GestureIntent::ShapeSketch => {
                let point = self.ensure_room(self.to_surface(screen));
                Gesture::ShapeSketching {
                    sample: StrokeSample::starting_at(point),
                    pending: PendingShape {
                        anchor: point,
                        classification: ShapeClassification::None,
                    },
                    preview_task: None,
                }
            }
            GestureIntent::ScratchErase => Gesture::ScratchErasing {
                sample: StrokeSample::starting_at(self.ensure_room(self.to_surface(screen))),
            },
        };
        log::debug!("Gesture: {}", self.gesture.name());

        let scratch_start = match &self.gesture {
            Gesture::ScratchErasing { sample } => sample.first(),
            _ => None,
        };
        if let Some(start) = scratch_start {
            self.scratch(start, start, now);
        }
    }

    fn continue_gesture(&mut self, screen: Point, now: Instant) {
        if let Gesture::Panning { last } = &mut self.gesture {
            let delta = screen - *last;
            *last = screen;
            self.camera.pan(delta);
            let under_pointer = self.to_surface(screen);
            self.ensure_room(under_pointer);
            return;
        }
        if !self.gesture.is_active() {
            return;
        }

        let point = self.ensure_room(self.to_surface(screen));
        match &mut self.gesture {
            Gesture::FreehandDrawing { last } => {
                let from = *last;
                *last = point;
                let brush = self.stroke_brush();
                self.renderer
                    .stroke_segment(self.surface.ink_mut(), from, point, &brush);
            }
            Gesture::ShapeSketching {
                sample,
                pending,
                preview_task,
            } => {
                sample.push(point);
                if let Some(task) = preview_task.take() {
                    self.scheduler.cancel(task);
                }
                *preview_task = Some(self.scheduler.schedule_after(
                    now,
                    self.config.preview_delay(),
                    BoardTask::ShapePreview,
                ));
                self.overlay.set_trail(sample.points());
                self.overlay.set_preview(Primitive::from_classification(
                    pending.classification,
                    pending.anchor,
                    point,
                ));
            }
            Gesture::ScratchErasing { sample } => {
                let from = sample.last().unwrap_or(point);
                sample.push(point);
                self.scratch(from, point, now);
            }
            Gesture::Idle | Gesture::Panning { .. } => {}
        }
    }

    fn end_gesture(&mut self, screen: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Panning { .. } => log::debug!("Pan finished at {:?}", self.camera.offset),
            Gesture::FreehandDrawing { .. } => {
                self.history.commit(self.surface.snapshot());
                log::debug!("Stroke committed ({} snapshots)", self.history.len());
            }
            Gesture::ShapeSketching {
                sample,
                pending,
                preview_task,
            } => {
                if let Some(task) = preview_task {
                    self.scheduler.cancel(task);
                }
                self.overlay.clear_sketch();
                let kind = classify(sample.points());
                let end = sample.last().unwrap_or(pending.anchor);
                match Primitive::from_classification(kind, pending.anchor, end) {
                    Some(primitive) => {
                        let brush = self.shape_brush();
                        self.renderer
                            .stroke_path(self.surface.ink_mut(), &primitive.to_path(), &brush);
                        self.history.commit(self.surface.snapshot());
                        log::debug!("Shape committed: {}", kind);
                    }
                    None => log::debug!("Sketch at {:?} matched no shape", screen),
                }
            }
            Gesture::ScratchErasing { sample } => {
                log::debug!("Scratch finished after {} samples", sample.len());
            }
        }
    }

    /// Abandon the active gesture. Uncommitted freehand ink is discarded.
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::ShapeSketching { preview_task, .. } => {
                if let Some(task) = preview_task {
                    self.scheduler.cancel(task);
                }
                self.overlay.clear_sketch();
            }
            Gesture::FreehandDrawing { .. } => {
                if let Some(current) = self.history.current() {
                    self.surface.restore(current);
                }
            }
            Gesture::Idle | Gesture::Panning { .. } | Gesture::ScratchErasing { .. } => {}
        }
    }

    /// One scratch step: highlight the segment, clear inked samples and drop
    /// any result the trail touches.
    fn scratch(&mut self, from: Point, to: Point, now: Instant) {
        let task = self.scheduler.schedule_after(
            now,
            self.config.highlight_revert(),
            BoardTask::RevertHighlight,
        );
        self.overlay.add_highlight(Highlight { task, from, to });

        let Gesture::ScratchErasing { sample } = &self.gesture else {
            return;
        };
        let half = self.line_width.round().max(1.0) as i64;
        let ink = self.surface.ink_mut();
        for p in sample.points() {
            if ink.alpha_at(*p) > 0 {
                let (x, y) = (p.x.floor() as i64, p.y.floor() as i64);
                ink.clear_rect(x - half, y - half, half * 2, half * 2);
            }
        }
        let removed = self.results.remove_touched(sample.points());
        if !removed.is_empty() {
            log::debug!("Scratch removed {} results", removed.len());
        }
    }

    // --- Timers ---

    /// Fire every scheduled task due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for (id, task) in self.scheduler.due(now) {
            log::debug!("Task {:?} fired: {:?}", id, task);
            match task {
                BoardTask::ShapePreview => self.snap_preview(id),
                BoardTask::RevertHighlight => {
                    self.overlay.remove_highlight(id);
                }
                BoardTask::PlaceResult { markup } => {
                    self.place_markup(markup);
                }
            }
        }
    }

    fn snap_preview(&mut self, id: TaskId) {
        let Gesture::ShapeSketching {
            sample,
            pending,
            preview_task,
        } = &mut self.gesture
        else {
            return;
        };
        if *preview_task != Some(id) {
            return;
        }
        *preview_task = None;
        pending.classification = classify(sample.points());
        let end = sample.last().unwrap_or(pending.anchor);
        self.overlay.set_preview(Primitive::from_classification(
            pending.classification,
            pending.anchor,
            end,
        ));
    }

    // --- Results ---

    pub(crate) fn place_markup(&mut self, markup: String) -> ResultId {
        self.results
            .place(markup, self.anchor, self.config.result_font_size)
    }

    /// Drag a result to `position` (surface coordinates). Dragging near an
    /// edge grows the surface.
    pub fn move_result(&mut self, id: ResultId, position: Point) -> bool {
        if self.results.get(id).is_none() {
            return false;
        }
        let position = self.ensure_room(position);
        self.results.move_to(id, position)
    }

    /// Record the typeset size the host measured for a result.
    pub fn set_result_size(&mut self, id: ResultId, size: Size) -> bool {
        self.results.set_size(id, size)
    }

    // --- Calculations ---

    /// Place a past calculation's answer again.
    pub fn recall_calculation(&mut self, index: usize) -> Option<ResultId> {
        let calculation = self.calculations.get(index)?;
        let markup = solution_markup(&calculation.expression, &calculation.answer);
        Some(self.place_markup(markup))
    }

    pub fn clear_calculations(&mut self) {
        self.calculations.clear();
        self.persist_calculations();
    }

    pub(crate) fn record_calculation(&mut self, calculation: Calculation) {
        self.calculations.push(calculation);
    }

    pub(crate) fn persist_calculations(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.calculations.to_vec()) {
            log::error!("Failed to save calculations: {}", e);
            self.notify(NoticeKind::StorageFailed, format!("Could not save history: {e}"));
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        match self.history.undo() {
            Some(snapshot) => {
                self.surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        match self.history.redo() {
            Some(snapshot) => {
                self.surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Clear the board back to a blank viewport-sized surface. The saved
    /// calculation log is kept.
    pub fn reset(&mut self) {
        self.cancel_gesture();
        self.scheduler.clear();
        self.overlay.clear();
        let (width, height) = surface_dims(self.viewport);
        self.surface.reset(width, height);
        self.surface.set_background(Background::default());
        self.history.reset(self.surface.snapshot());
        self.results.clear();
        self.variables.clear();
        self.camera.reset();
        self.anchor = DEFAULT_ANCHOR;
        self.recognized_text = None;
        self.limit_reported = false;
        self.history_panel_open = false;
        // Outcomes still in flight are dropped when they arrive.
        self.solving = false;
        self.recognizing = false;
        log::info!("Board reset to {}x{}", width, height);
    }

    // --- Keyboard ---

    /// Run the action bound to a key. [`Action::Solve`] is returned for the
    /// host to run with its solver.
    pub fn handle_shortcut(&mut self, key: &str, modifiers: Modifiers) -> Option<Action> {
        let action = ShortcutRegistry::lookup(key, modifiers)?;
        match action {
            Action::Undo => {
                self.undo();
            }
            Action::Redo => {
                self.redo();
            }
            Action::ToggleHistoryPanel => self.toggle_history_panel(),
            Action::ZoomIn => {
                self.zoom_by(self.config.zoom_step);
            }
            Action::ZoomOut => {
                self.zoom_by(-self.config.zoom_step);
            }
            Action::CancelGesture => self.cancel_gesture(),
            Action::Solve => {}
        }
        Some(action)
    }

    // --- Rendering ---

    /// Background and ink in one raster.
    pub fn flatten(&self) -> RasterBuffer {
        self.renderer.flatten(&self.surface, self.dark_mode)
    }

    /// The transient overlay at surface size.
    pub fn render_overlay(&self) -> RasterBuffer {
        self.overlay.render(
            &self.renderer,
            self.surface.width(),
            self.surface.height(),
            &self.shape_brush(),
        )
    }

    /// Encode the flattened surface as PNG.
    pub fn export_png(&mut self) -> RenderResult<Vec<u8>> {
        encode_png(&self.flatten()).inspect_err(|e| {
            log::error!("PNG export failed: {}", e);
            self.notices
                .push(Notice::new(NoticeKind::ExportFailed, e.to_string()));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn board() -> Board {
        Board::new(BoardConfig::default(), Size::new(800.0, 600.0))
    }

    fn drag(board: &mut Board, modifiers: Modifiers, points: &[Point], now: Instant) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        board.handle_pointer(PointerEvent::down(*first, modifiers), now);
        for p in rest {
            board.handle_pointer(PointerEvent::moved(*p), now);
        }
        if let Some(last) = points.last() {
            board.handle_pointer(PointerEvent::up(*last), now);
        }
    }

    #[test]
    fn test_new_board_matches_viewport() {
        let board = board();
        assert_eq!((board.surface().width(), board.surface().height()), (800, 600));
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.anchor(), DEFAULT_ANCHOR);
    }

    #[test]
    fn test_freehand_stroke_commits_once() {
        let mut board = board();
        let now = Instant::now();
        drag(
            &mut board,
            Modifiers::NONE,
            &[Point::new(200.0, 200.0), Point::new(250.0, 200.0), Point::new(300.0, 220.0)],
            now,
        );
        assert_eq!(board.history().len(), 2);
        assert!(board.surface().ink().alpha_at(Point::new(250.0, 200.0)) > 0);
        assert!(!board.gesture().is_active());
    }

    #[test]
    fn test_eraser_tool_clears_ink() {
        let mut board = board();
        let now = Instant::now();
        let line = [Point::new(200.0, 200.0), Point::new(300.0, 200.0)];
        drag(&mut board, Modifiers::NONE, &line, now);
        board.set_tool(ToolKind::Eraser);
        board.set_line_width(10.0);
        drag(&mut board, Modifiers::NONE, &line, now);
        assert_eq!(board.surface().ink().alpha_at(Point::new(250.0, 200.0)), 0);
    }

    #[test]
    fn test_second_press_is_ignored() {
        let mut board = board();
        let now = Instant::now();
        board.handle_pointer(PointerEvent::down(Point::new(200.0, 200.0), Modifiers::ALT), now);
        board.handle_pointer(PointerEvent::down(Point::new(300.0, 300.0), Modifiers::SHIFT), now);
        assert!(matches!(board.gesture(), Gesture::ShapeSketching { .. }));
    }

    #[test]
    fn test_secondary_button_does_nothing() {
        let mut board = board();
        board.handle_pointer(
            PointerEvent::Down {
                position: Point::new(200.0, 200.0),
                button: MouseButton::Right,
                modifiers: Modifiers::NONE,
            },
            Instant::now(),
        );
        assert!(!board.gesture().is_active());
    }

    #[test]
    fn test_preview_snaps_after_quiet_period() {
        let mut board = board();
        let now = Instant::now();
        board.handle_pointer(PointerEvent::down(Point::new(200.0, 300.0), Modifiers::ALT), now);
        for x in [220.0, 240.0, 260.0, 280.0] {
            board.handle_pointer(PointerEvent::moved(Point::new(x, 300.0)), now);
        }
        assert!(board.overlay().preview().is_none());

        board.tick(now + Duration::from_millis(499));
        assert!(board.overlay().preview().is_none());

        board.tick(now + Duration::from_millis(500));
        assert!(matches!(
            board.overlay().preview(),
            Some(Primitive::Line { .. })
        ));
        // Previewing never commits.
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_each_move_restarts_preview_timer() {
        let mut board = board();
        let start = Instant::now();
        board.handle_pointer(PointerEvent::down(Point::new(200.0, 300.0), Modifiers::ALT), start);
        board.handle_pointer(PointerEvent::moved(Point::new(220.0, 300.0)), start);
        board.handle_pointer(PointerEvent::moved(Point::new(240.0, 300.0)), start);
        let later = start + Duration::from_millis(400);
        board.handle_pointer(PointerEvent::moved(Point::new(260.0, 300.0)), later);

        board.tick(start + Duration::from_millis(600));
        assert!(board.overlay().preview().is_none());
        assert_eq!(board.scheduler.len(), 1);

        board.tick(later + Duration::from_millis(500));
        assert!(board.overlay().preview().is_some());
    }

    #[test]
    fn test_cancel_sketch_drops_preview_task() {
        let mut board = board();
        let now = Instant::now();
        board.handle_pointer(PointerEvent::down(Point::new(200.0, 300.0), Modifiers::ALT), now);
        board.handle_pointer(PointerEvent::moved(Point::new(260.0, 300.0)), now);
        assert_eq!(board.handle_shortcut("Escape", Modifiers::NONE), Some(Action::CancelGesture));
        assert!(board.scheduler.is_empty());
        assert!(board.overlay().is_empty());
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_unrecognized_sketch_commits_nothing() {
        let mut board = board();
        // Two points only.
        drag(
            &mut board,
            Modifiers::ALT,
            &[Point::new(200.0, 300.0), Point::new(260.0, 300.0)],
            Instant::now(),
        );
        assert_eq!(board.history().len(), 1);
        assert!(board.surface().ink().is_blank());
    }

    #[test]
    fn test_scratch_erases_and_reverts_highlight() {
        let mut board = board();
        let now = Instant::now();
        drag(
            &mut board,
            Modifiers::NONE,
            &[Point::new(200.0, 200.0), Point::new(300.0, 200.0)],
            now,
        );
        let commits = board.history().len();

        drag(
            &mut board,
            Modifiers::CTRL,
            &[Point::new(250.0, 180.0), Point::new(250.0, 200.0), Point::new(250.0, 220.0)],
            now,
        );
        assert_eq!(board.surface().ink().alpha_at(Point::new(250.0, 200.0)), 0);
        assert!(board.surface().ink().alpha_at(Point::new(210.0, 200.0)) > 0);
        assert_eq!(board.history().len(), commits);
        assert!(!board.overlay().highlights().is_empty());

        board.tick(now + Duration::from_millis(500));
        assert!(board.overlay().highlights().is_empty());
        // Erasure outlives the highlight.
        assert_eq!(board.surface().ink().alpha_at(Point::new(250.0, 200.0)), 0);
    }

    #[test]
    fn test_pan_moves_camera() {
        let mut board = board();
        drag(
            &mut board,
            Modifiers::SHIFT,
            &[Point::new(400.0, 300.0), Point::new(430.0, 310.0)],
            Instant::now(),
        );
        assert_eq!(board.camera().offset, Vec2::new(30.0, 10.0));
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_pan_press_at_edge_leaves_surface() {
        let mut board = board();
        let now = Instant::now();
        board.handle_pointer(PointerEvent::down(Point::new(5.0, 300.0), Modifiers::SHIFT), now);
        assert!(matches!(board.gesture(), Gesture::Panning { .. }));
        assert_eq!(board.surface().width(), 800);
        board.handle_pointer(PointerEvent::up(Point::new(5.0, 300.0)), now);
        assert!(board.surface().ink().is_blank());
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_wheel_zoom() {
        let mut board = board();
        assert!(!board.handle_wheel(-1.0, Modifiers::NONE));
        assert!(board.handle_wheel(-1.0, Modifiers::CTRL));
        assert!((board.camera().zoom - 1.05).abs() < 1e-9);
        for _ in 0..100 {
            board.handle_wheel(1.0, Modifiers::CTRL);
        }
        assert!((board.camera().zoom - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_undo_redo_restores_geometry() {
        let mut board = board();
        let now = Instant::now();
        // Drawing near the right edge grows the surface first.
        drag(
            &mut board,
            Modifiers::NONE,
            &[Point::new(780.0, 300.0), Point::new(790.0, 300.0)],
            now,
        );
        let grown = board.surface().width();
        assert_eq!(grown, 960);
        let drawn = board.surface().ink().clone();

        while board.undo() {}
        assert_eq!(board.surface().width(), 800);
        while board.redo() {}
        assert_eq!(board.surface().width(), grown);
        assert_eq!(board.surface().ink(), &drawn);
    }

    #[test]
    fn test_dark_mode_switches_brush() {
        let mut board = board();
        board.set_dark_mode(true);
        assert_eq!(board.color(), InkColor::WHITE);
        assert_eq!(board.board_color(), InkColor::DARK_BOARD);
        board.set_dark_mode(false);
        assert_eq!(board.color(), InkColor::BLACK);
    }

    #[test]
    fn test_reset() {
        let mut board = board();
        let now = Instant::now();
        drag(
            &mut board,
            Modifiers::NONE,
            &[Point::new(5.0, 5.0), Point::new(300.0, 300.0)],
            now,
        );
        board.set_background(Background::Grid);
        board.zoom_by(0.5);
        board.recall_calculation(0);
        board.toggle_history_panel();
        assert!(board.is_history_panel_open());

        board.reset();
        assert_eq!((board.surface().width(), board.surface().height()), (800, 600));
        assert!(board.surface().ink().is_blank());
        assert_eq!(board.history().len(), 1);
        assert_eq!(board.background(), Background::Transparent);
        assert!((board.camera().zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(board.camera().offset, Vec2::ZERO);
        assert!(board.results().is_empty());
        assert!(!board.is_history_panel_open());
    }

    #[test]
    fn test_toggle_history_panel_shortcut() {
        let mut board = board();
        assert!(!board.is_history_panel_open());
        board.handle_shortcut("h", Modifiers::CTRL);
        assert!(board.is_history_panel_open());
    }
}
