//! Keyboard shortcut registry and documentation.

use layoutlab_core::input::KeyCommand;
use layoutlab_core::{Key, KeyEvent, Modifiers};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
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

    /// The key event this shortcut stands for.
    pub fn event(&self) -> KeyEvent {
        let modifiers = Modifiers {
            ctrl: self.ctrl,
            shift: self.shift,
            ..Modifiers::NONE
        };
        KeyEvent::new(Key::from_name(self.key), modifiers)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("D", true, false, "Duplicate the primary selection"),
            Shortcut::new("Delete", false, false, "Delete selected elements"),
            Shortcut::new("Backspace", false, false, "Delete selected elements"),
            Shortcut::new("Escape", false, false, "Clear the selection"),
            Shortcut::new("ArrowLeft", false, false, "Nudge selection left"),
            Shortcut::new("ArrowRight", false, false, "Nudge selection right"),
            Shortcut::new("ArrowUp", false, false, "Nudge selection up"),
            Shortcut::new("ArrowDown", false, false, "Nudge selection down"),
        ]
    }

    /// Print all shortcuts to stdout.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!("  {:20} {}", "Shift+Click", "Add or remove an element from the selection");
        println!();
    }
}
