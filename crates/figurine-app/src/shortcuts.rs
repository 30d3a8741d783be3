//! Keyboard shortcut registry and documentation.

use figurine_core::ToolKind;

/// A keyboard shortcut definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortcut {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub description: String,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, ctrl: bool, shift: bool, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift,
            description: description.into(),
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+G").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key.as_str());
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts, tools first.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts: Vec<Shortcut> = ToolKind::ALL
            .iter()
            .map(|tool| {
                Shortcut::new(
                    tool.shortcut().to_ascii_uppercase().to_string(),
                    false,
                    false,
                    format!("{} tool", capitalize(tool.as_str())),
                )
            })
            .collect();

        shortcuts.extend([
            Shortcut::new("A", true, false, "Select all layers"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("D", true, false, "Duplicate selected layer"),
            Shortcut::new("G", true, false, "Group selected layers"),
            Shortcut::new("G", true, true, "Ungroup selected group"),
            Shortcut::new("C", true, false, "Copy layers"),
            Shortcut::new("X", true, false, "Cut layers"),
            Shortcut::new("V", true, false, "Paste layers"),
            Shortcut::new("Delete", false, false, "Delete selected layers"),
            Shortcut::new("Backspace", false, false, "Delete selected layers"),
            Shortcut::new("Escape", false, false, "Cancel current action"),
        ]);
        shortcuts
    }

    /// One formatted line per shortcut.
    pub fn lines() -> Vec<String> {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}", s.format(), s.description))
            .collect()
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for line in Self::lines() {
            println!("{}", line);
        }
        println!();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
