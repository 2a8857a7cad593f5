use kurbo::{Point, Size};
use mathink_app::{Board, NoticeKind};
use mathink_core::config::BoardConfig;
use mathink_core::input::{Modifiers, PointerEvent};
use mathink_core::services::{
    BoxFuture, MarkupConverter, OcrEngine, ServiceError, ServiceResult, SolveRequest, Solver,
    SolverEntry,
};
use mathink_core::storage::{CalculationStore, FileStore, MemoryStore};
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn board() -> Board {
    init_logger();
    Board::new(BoardConfig::default(), Size::new(800.0, 600.0))
}

fn entry(expr: &str, result: &str, assign: bool) -> SolverEntry {
    SolverEntry {
        expr: expr.to_string(),
        result: result.to_string(),
        assign,
    }
}

/// Replies with fixed entries and remembers the last request.
struct FixedSolver {
    entries: Vec<SolverEntry>,
    last_request: RefCell<Option<SolveRequest>>,
}

impl FixedSolver {
    fn new(entries: Vec<SolverEntry>) -> Self {
        Self {
            entries,
            last_request: RefCell::new(None),
        }
    }
}

impl Solver for FixedSolver {
    fn solve(&self, request: SolveRequest) -> BoxFuture<'_, ServiceResult<Vec<SolverEntry>>> {
        *self.last_request.borrow_mut() = Some(request);
        let entries = self.entries.clone();
        Box::pin(async move { Ok(entries) })
    }
}

struct FailingSolver;

impl Solver for FailingSolver {
    fn solve(&self, _request: SolveRequest) -> BoxFuture<'_, ServiceResult<Vec<SolverEntry>>> {
        Box::pin(async { Err(ServiceError::Unavailable("connection refused".to_string())) })
    }
}

struct FakeOcr {
    text: ServiceResult<String>,
    last_language: RefCell<Option<String>>,
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, png: Vec<u8>, language: &str) -> BoxFuture<'_, ServiceResult<String>> {
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        *self.last_language.borrow_mut() = Some(language.to_string());
        let text = self.text.clone();
        Box::pin(async move { text })
    }
}

struct FakeConverter {
    fail: bool,
}

impl MarkupConverter for FakeConverter {
    fn to_markup(&self, text: &str) -> BoxFuture<'_, ServiceResult<String>> {
        let result = if self.fail {
            Err(ServiceError::Timeout)
        } else {
            Ok(format!(r"\({}\)", text.replace('$', "")))
        };
        Box::pin(async move { result })
    }
}

fn draw_something(board: &mut Board) {
    let now = Instant::now();
    board.handle_pointer(PointerEvent::down(Point::new(100.0, 100.0), Modifiers::NONE), now);
    board.handle_pointer(PointerEvent::moved(Point::new(200.0, 140.0)), now);
    board.handle_pointer(PointerEvent::up(Point::new(200.0, 140.0)), now);
}

#[test]
fn solve_places_results_with_stagger() {
    let mut board = board();
    draw_something(&mut board);
    let solver = FixedSolver::new(vec![entry("x", "3", true), entry("x * 2", "6", false)]);

    let count = pollster::block_on(board.solve(&solver));
    assert_eq!(count, 2);
    assert!(!board.is_solving());

    // Anchored at the center of the drawn stroke.
    let anchor = board.anchor();
    assert!((anchor.x - 150.0).abs() <= 2.0);
    assert!((anchor.y - 120.0).abs() <= 2.0);

    assert_eq!(board.results().len(), 1);
    board.tick(Instant::now() + Duration::from_millis(1000));
    assert_eq!(board.results().len(), 2);
    assert_eq!(board.results()[1].markup, r"\(\LARGE{x * 2 = 6}\)");

    // Assigned variables travel with the next request.
    pollster::block_on(board.solve(&solver));
    let request = solver.last_request.borrow().clone().unwrap();
    assert_eq!(request.dict_of_vars.get("x").map(String::as_str), Some("3"));
    assert!(request.image.starts_with("data:image/png;base64,"));
}

#[test]
fn solver_failure_raises_notice() {
    let mut board = board();
    let count = pollster::block_on(board.solve(&FailingSolver));
    assert_eq!(count, 0);
    assert!(board.results().is_empty());
    assert!(board.calculations().is_empty());
    let notices = board.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::SolverFailed);
    assert!(!board.is_solving());
}

#[test]
fn handwriting_is_converted_and_placed() {
    let mut board = board();
    draw_something(&mut board);
    let ocr = FakeOcr {
        text: Ok(" $a+b$ \n".to_string()),
        last_language: RefCell::new(None),
    };

    let id = pollster::block_on(board.convert_handwriting(&ocr, &FakeConverter { fail: false }))
        .unwrap();
    assert_eq!(ocr.last_language.borrow().as_deref(), Some("eng"));
    assert_eq!(board.recognized_text(), Some("$a+b$"));

    let placed = board.results().iter().find(|r| r.id == id).unwrap();
    assert_eq!(placed.markup, r"\(a+b\)");
    assert_eq!(placed.position, Point::new(10.0, 200.0));
    assert!(board.take_notices().is_empty());
}

#[test]
fn failed_conversion_falls_back_to_raw_text() {
    let mut board = board();
    let ocr = FakeOcr {
        text: Ok("$y=2$".to_string()),
        last_language: RefCell::new(None),
    };
    let id = pollster::block_on(board.convert_handwriting(&ocr, &FakeConverter { fail: true }))
        .unwrap();
    let placed = board.results().iter().find(|r| r.id == id).unwrap();
    assert_eq!(placed.markup, r"\(y=2\)");
    assert_eq!(board.take_notices()[0].kind, NoticeKind::MarkupFallback);
}

#[test]
fn failed_recognition_places_nothing() {
    let mut board = board();
    board.set_dark_mode(true);
    let ocr = FakeOcr {
        text: Err(ServiceError::Other("engine crashed".to_string())),
        last_language: RefCell::new(None),
    };
    let placed = pollster::block_on(board.convert_handwriting(&ocr, &FakeConverter { fail: false }));
    assert!(placed.is_none());
    assert!(board.results().is_empty());
    assert_eq!(board.take_notices()[0].kind, NoticeKind::RecognitionFailed);
    assert!(!board.is_recognizing());
}

#[test]
fn calculations_persist_across_boards() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mathink").join("calculations.json");

    let mut board = board().with_store(Box::new(FileStore::new(&path)));
    assert!(board.calculations().is_empty());
    let solver = FixedSolver::new(vec![entry("1+1", "2", false)]);
    pollster::block_on(board.solve(&solver));
    assert!(path.exists());

    let mut reopened = Board::new(BoardConfig::default(), Size::new(800.0, 600.0))
        .with_store(Box::new(FileStore::new(&path)));
    assert_eq!(reopened.calculations().len(), 1);
    let calculation = reopened.calculations().get(0).unwrap();
    assert_eq!(calculation.expression, "1+1");
    assert_eq!(calculation.answer, "2");

    let id = reopened.recall_calculation(0).unwrap();
    let placed = reopened.results().iter().find(|r| r.id == id).unwrap();
    assert_eq!(placed.markup, r"\(\LARGE{1+1 = 2}\)");
    assert!(reopened.recall_calculation(5).is_none());

    reopened.clear_calculations();
    assert!(FileStore::new(&path).load().unwrap().is_empty());
}

#[test]
fn corrupt_store_starts_empty() {
    let board = board().with_store(Box::new(MemoryStore::with_json("{not json")));
    assert!(board.calculations().is_empty());

    let dir = tempdir().unwrap();
    let path = dir.path().join("calculations.json");
    std::fs::write(&path, "[{\"expression\": 1}]").unwrap();
    let board = Board::new(BoardConfig::default(), Size::new(800.0, 600.0))
        .with_store(Box::new(FileStore::new(&path)));
    assert!(board.calculations().is_empty());
}

#[test]
fn calculation_log_is_bounded() {
    init_logger();
    let config = BoardConfig {
        calculation_limit: 3,
        ..BoardConfig::default()
    };
    let mut board = Board::new(config, Size::new(400.0, 300.0));
    let entries = (0..5).map(|i| entry(&format!("{i}+0"), &i.to_string(), false)).collect();
    pollster::block_on(board.solve(&FixedSolver::new(entries)));
    assert_eq!(board.calculations().len(), 3);
    assert_eq!(board.calculations().get(0).unwrap().expression, "2+0");
}
