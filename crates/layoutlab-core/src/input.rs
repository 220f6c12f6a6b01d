//! Pointer and keyboard events delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Host-assigned pointer identity (one per mouse, pen or touch contact).
pub type PointerId = i32;

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Auxiliary,
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
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers { shift: true, ..Self::NONE };

    pub const CTRL: Modifiers = Modifiers { ctrl: true, ..Self::NONE };

    /// The platform command modifier: Ctrl or Cmd.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A press, move, release or cancel in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub position: Point,
    #[serde(default)]
    pub button: PointerButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary-button event without modifiers.
    pub fn new(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Character(char),
    Other(String),
}

impl Key {
    /// Parse a browser `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c.to_ascii_lowercase()),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Focus is inside a text-editing target (input, textarea,
    /// contenteditable). Such events are left to the target.
    #[serde(default)]
    pub in_text_target: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            in_text_target: false,
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(Key::from_name(name), Modifiers::NONE)
    }
}

/// Editor action bound to a key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    DeleteSelection,
    Nudge(Vec2),
    Undo,
    Redo,
    Duplicate,
    ClearSelection,
}

impl KeyCommand {
    /// Map a key event to a command. `step` is the nudge distance.
    pub fn from_event(event: &KeyEvent, step: f64) -> Option<Self> {
        if event.in_text_target {
            return None;
        }
        let m = event.modifiers;
        match &event.key {
            Key::Delete | Key::Backspace => Some(KeyCommand::DeleteSelection),
            Key::Escape => Some(KeyCommand::ClearSelection),
            Key::ArrowLeft => Some(KeyCommand::Nudge(Vec2::new(-step, 0.0))),
            Key::ArrowRight => Some(KeyCommand::Nudge(Vec2::new(step, 0.0))),
            Key::ArrowUp => Some(KeyCommand::Nudge(Vec2::new(0.0, -step))),
            Key::ArrowDown => Some(KeyCommand::Nudge(Vec2::new(0.0, step))),
            Key::Character('z') if m.command() && m.shift => Some(KeyCommand::Redo),
            Key::Character('z') if m.command() => Some(KeyCommand::Undo),
            Key::Character('y') if m.command() => Some(KeyCommand::Redo),
            Key::Character('d') if m.command() => Some(KeyCommand::Duplicate),
            _ => None,
        }
    }
}
