//! Raw pointer and keyboard events as delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
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

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::NONE }
    }

    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn command() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }
}

fn one() -> u32 {
    1
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
        /// 1 for a single click, 2 for the second press of a double-click.
        #[serde(default = "one")]
        click_count: u32,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            click_count: 1,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn double_down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            click_count: 2,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        PointerEvent::Wheel {
            position: Point::new(x, y),
            delta: Vec2::new(0.0, delta_y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Same event with different modifiers.
    pub fn with_modifiers(mut self, mods: Modifiers) -> Self {
        match &mut self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Wheel { modifiers, .. } => *modifiers = mods,
        }
        self
    }

    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Wheel { position, .. } => *position,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Wheel { modifiers, .. } => *modifiers,
        }
    }
}

/// A keyboard key relevant to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
    Enter,
}

impl Key {
    pub fn parse(name: &str) -> Option<Key> {
        match name {
            "Delete" => Some(Key::Delete),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            "Enter" => Some(Key::Enter),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c.to_ascii_lowercase())),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Escape => f.write_str("Escape"),
            Key::Enter => f.write_str("Enter"),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Key::parse(&value).ok_or_else(|| format!("unknown key '{}'", value))
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// Key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// A text input has focus; editor shortcuts must not fire.
    #[serde(default)]
    pub text_focus: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            text_focus: false,
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }

    pub fn command(c: char) -> Self {
        Self {
            modifiers: Modifiers::command(),
            ..Self::char(c)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_field(mut self) -> Self {
        self.text_focus = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_event_json() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"type":"down","position":{"x":10,"y":20}}"#).unwrap();
        assert_eq!(event, PointerEvent::down(10.0, 20.0));

        let wheel: PointerEvent =
            serde_json::from_str(r#"{"type":"wheel","position":{"x":0,"y":0},"delta":{"x":0,"y":-3}}"#).unwrap();
        assert_eq!(wheel, PointerEvent::wheel(0.0, 0.0, -3.0));
    }

    #[test]
    fn test_key_event_json() {
        let event: KeyEvent =
            serde_json::from_str(r#"{"key":"G","modifiers":{"ctrl":true,"shift":true}}"#).unwrap();
        assert_eq!(event.key, Key::Char('g'));
        assert!(event.modifiers.is_command());
        assert!(event.modifiers.shift);
        assert!(!event.text_focus);

        assert!(serde_json::from_str::<KeyEvent>(r#"{"key":"F13"}"#).is_err());
        assert_eq!(serde_json::to_value(Key::Escape).unwrap(), "Escape");
    }

    #[test]
    fn test_with_modifiers() {
        let event = PointerEvent::down(1.0, 2.0).with_modifiers(Modifiers::shift());
        assert!(event.modifiers().shift);
        assert_eq!(event.position(), Point::new(1.0, 2.0));
    }
}
