//! Keyboard shortcut registry.

use mathink_core::input::Modifiers;

/// Board actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Undo,
    Redo,
    ToggleHistoryPanel,
    ZoomIn,
    ZoomOut,
    /// Needs a solver, so the host runs it.
    Solve,
    CancelGesture,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: Action,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: Action,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        // Meta stands in for Ctrl on macOS.
        let ctrl = modifiers.ctrl || modifiers.meta;
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == modifiers.shift
    }
}

const SHORTCUTS: &[Shortcut] = &[
    Shortcut::new("Z", true, false, Action::Undo, "Undo"),
    Shortcut::new("Z", true, true, Action::Redo, "Redo"),
    Shortcut::new("Y", true, false, Action::Redo, "Redo"),
    Shortcut::new("H", true, false, Action::ToggleHistoryPanel, "Toggle calculation history"),
    Shortcut::new("=", true, false, Action::ZoomIn, "Zoom in"),
    Shortcut::new("+", true, true, Action::ZoomIn, "Zoom in"),
    Shortcut::new("-", true, false, Action::ZoomOut, "Zoom out"),
    Shortcut::new("Enter", true, false, Action::Solve, "Solve the board"),
    Shortcut::new("Escape", false, false, Action::CancelGesture, "Cancel current gesture"),
];

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> &'static [Shortcut] {
        SHORTCUTS
    }

    /// Action bound to `key` with `modifiers`, if any.
    pub fn lookup(key: &str, modifiers: Modifiers) -> Option<Action> {
        SHORTCUTS
            .iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.action)
    }
}
