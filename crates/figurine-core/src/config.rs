//! Editor configuration and user preferences.

use crate::history::DEFAULT_HISTORY_CAPACITY;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Tunables of the document store and canvas input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots kept for undo.
    pub history_capacity: usize,
    /// Offset applied to a duplicated layer.
    pub duplicate_offset: Vec2,
    /// Offset added after every paste.
    pub paste_step: Vec2,
    /// Rectangles and ellipses smaller than this on both axes are discarded
    /// on pointer-up.
    pub min_draft_size: f64,
    /// Frame preset picker lifetime, in milliseconds.
    pub frame_picker_timeout_ms: u64,
    /// Hit-test slop around each layer, in world units.
    pub hit_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            duplicate_offset: Vec2::new(20.0, 20.0),
            paste_step: Vec2::new(10.0, 10.0),
            min_draft_size: 5.0,
            frame_picker_timeout_ms: 3000,
            hit_tolerance: 0.0,
        }
    }
}

impl EditorConfig {
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

/// Settings panel toggles. Not part of undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub auto_save: bool,
    pub show_grid: bool,
    pub show_rulers: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            auto_save: true,
            show_grid: false,
            show_rulers: false,
        }
    }
}
