//! Tools and the transient state they build up between pointer events.

use crate::ids::LayerId;
use crate::layers::{FramePreset, Layer, LayerKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Frame,
    Rectangle,
    Ellipse,
    Text,
    Line,
    Arrow,
    Pen,
    Hand,
    Zoom,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Frame,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Text,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Pen,
        ToolKind::Hand,
        ToolKind::Zoom,
    ];

    /// Unmodified key that switches to this tool.
    pub fn shortcut(&self) -> char {
        match self {
            ToolKind::Select => 'v',
            ToolKind::Frame => 'f',
            ToolKind::Rectangle => 'r',
            ToolKind::Ellipse => 'o',
            ToolKind::Text => 't',
            ToolKind::Line => 'l',
            ToolKind::Arrow => 'a',
            ToolKind::Pen => 'p',
            ToolKind::Hand => 'h',
            ToolKind::Zoom => 'z',
        }
    }

    pub fn from_shortcut(key: char) -> Option<ToolKind> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.shortcut() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Frame => "frame",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Text => "text",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Pen => "pen",
            ToolKind::Hand => "hand",
            ToolKind::Zoom => "zoom",
        }
    }

    /// Tools that build a shape by dragging out a box.
    pub fn is_drag_shape(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Line | ToolKind::Arrow
        )
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress pointer interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// A shape being dragged out; not yet in the document.
    Drawing { anchor: Point, draft: Layer },
    /// Pen path capture, world points in click order.
    PenPath { points: Vec<Point> },
    /// Hand-tool panning; last pointer position in screen space.
    Panning { last: Point },
    /// Select-tool press on a layer, possibly turning into a drag of the
    /// selection. `last` is in world space. `collapse` means a release without
    /// movement narrows the selection to `pressed`.
    Moving {
        last: Point,
        pressed: LayerId,
        moved: bool,
        collapse: bool,
    },
}

impl ToolState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ToolState::Idle)
    }
}

/// Zero-extent draft for a drag-shape tool anchored at `anchor`.
pub fn begin_draft(tool: ToolKind, anchor: Point) -> Option<Layer> {
    let layer = match tool {
        ToolKind::Rectangle => Layer::rectangle(anchor.x, anchor.y, 0.0, 0.0),
        ToolKind::Ellipse => Layer::ellipse(anchor.x, anchor.y, 0.0, 0.0),
        ToolKind::Line => Layer::line(anchor.x, anchor.y, 0.0, 0.0),
        ToolKind::Arrow => Layer::arrow(anchor.x, anchor.y, 0.0, 0.0),
        _ => return None,
    };
    Some(layer)
}

/// Stretch `draft` between `anchor` and `current`.
///
/// Boxes are normalized to the top-left corner; lines keep the anchor as
/// origin and point at the cursor.
pub fn update_draft(draft: &mut Layer, anchor: Point, current: Point) {
    let delta = current - anchor;
    draft.width = delta.x.abs();
    draft.height = delta.y.abs();
    match &mut draft.kind {
        LayerKind::Line(line) | LayerKind::Arrow(line) => {
            draft.x = anchor.x;
            draft.y = anchor.y;
            line.set_end(delta.x, delta.y);
        }
        _ => {
            draft.x = anchor.x.min(current.x);
            draft.y = anchor.y.min(current.y);
        }
    }
}

/// Whether a finished draft is worth keeping. Lines and arrows always are.
pub fn should_commit(draft: &Layer, min_size: f64) -> bool {
    match draft.kind {
        LayerKind::Line(_) | LayerKind::Arrow(_) => true,
        _ => draft.width > min_size || draft.height > min_size,
    }
}

/// Popup offering frame presets at the point the frame tool was clicked.
#[derive(Debug, Clone)]
pub struct FramePresetPicker {
    pub anchor: Point,
    opened_at: Instant,
    timeout: Duration,
}

impl FramePresetPicker {
    pub fn open(anchor: Point, now: Instant, timeout: Duration) -> Self {
        Self {
            anchor,
            opened_at: now,
            timeout,
        }
    }

    pub fn presets(&self) -> &'static [FramePreset] {
        FramePreset::all()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.opened_at) >= self.timeout
    }

    /// Frame layer of the preset's size at the anchor.
    pub fn build(&self, preset: &FramePreset) -> Layer {
        Layer::frame(self.anchor.x, self.anchor.y, preset.width, preset.height).with_name(preset.name)
    }
}
