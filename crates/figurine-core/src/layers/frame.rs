//! Frame layer properties and device presets.

use serde::{Deserialize, Serialize};

/// Fields carried only by frame layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameProps {
    #[serde(default = "default_clip")]
    pub clip_content: bool,
}

fn default_clip() -> bool {
    true
}

impl Default for FrameProps {
    fn default() -> Self {
        Self { clip_content: true }
    }
}

/// A fixed frame size offered by the frame tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePreset {
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
}

impl FramePreset {
    pub const fn new(name: &'static str, width: f64, height: f64) -> Self {
        Self { name, width, height }
    }

    /// All presets, in picker order.
    pub fn all() -> &'static [FramePreset] {
        FRAME_PRESETS
    }

    /// Look up a preset by name (case-insensitive).
    pub fn find(name: &str) -> Option<FramePreset> {
        FRAME_PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .copied()
    }
}

const FRAME_PRESETS: &[FramePreset] = &[
    FramePreset::new("Desktop", 1440.0, 1024.0),
    FramePreset::new("MacBook Pro", 1512.0, 982.0),
    FramePreset::new("Tablet", 768.0, 1024.0),
    FramePreset::new("iPhone 14", 390.0, 844.0),
    FramePreset::new("Android", 360.0, 800.0),
    FramePreset::new("Watch", 198.0, 242.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_preset_ignores_case() {
        let preset = FramePreset::find("iphone 14").unwrap();
        assert!((preset.width - 390.0).abs() < f64::EPSILON);
        assert!(FramePreset::find("Fridge").is_none());
    }
}
