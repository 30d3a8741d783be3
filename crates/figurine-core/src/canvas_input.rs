//! Canvas input state machine.
//!
//! [`CanvasInput`] turns pointer and keyboard events plus the store's current
//! tool into store mutations. It only owns transient state (drafts, the pen
//! path, pan anchors, the frame preset picker); everything persistent lives in
//! the [`DocumentStore`].

use crate::config::EditorConfig;
use crate::geometry::{BoundsHitTester, HitTester};
use crate::ids::LayerId;
use crate::input::{Key, KeyEvent, MouseButton, PointerEvent};
use crate::layers::{DEFAULT_TEXT, FramePreset, Layer, LayerKind, LayerPatch};
use crate::store::DocumentStore;
use crate::tools::{FramePresetPicker, ToolKind, ToolState, begin_draft, should_commit, update_draft};
use crate::viewport::ZOOM_STEP;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Minimum size of a layer after an interactive resize.
pub const MIN_TRANSFORM_SIZE: f64 = 5.0;
/// Minimum height of an ellipse after an interactive resize.
pub const MIN_ELLIPSE_HEIGHT: f64 = 10.0;

/// Final attributes of a node when a resize/rotate handle is released.
///
/// The host applies the drag as a scale on top of the stored size; the scale
/// is baked into width and height on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformCommit {
    pub id: LayerId,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Scale the host should reset its node to after a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformReset {
    pub id: LayerId,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Commit interactive transforms as a single undo step.
///
/// Line, arrow and vector points stretch with the new size. A group scales
/// its descendants' relative geometry along with its own box.
pub fn transform_end(store: &mut DocumentStore, commits: &[TransformCommit]) -> Vec<TransformReset> {
    let mut resets = Vec::with_capacity(commits.len());
    store.begin_gesture();
    for commit in commits {
        let Some(layer) = store.layer(&commit.id) else {
            continue;
        };
        let (width, height) = resized(layer, commit.scale_x, commit.scale_y);
        let fx = stretch(layer.width, width);
        let fy = stretch(layer.height, height);
        let mut patch = scaled_patch(layer, commit.x, commit.y, fx, fy).with_rotation(commit.rotation);
        patch.width = Some(width);
        patch.height = Some(height);
        store.update_layer(&commit.id, &patch);
        scale_children(store, &commit.id, fx, fy, &mut HashSet::new());
        resets.push(TransformReset {
            id: commit.id.clone(),
            scale_x: 1.0,
            scale_y: 1.0,
        });
    }
    store.end_gesture();
    resets
}

/// Size of `layer` after a handle scale, clamped to the minimums. Strokes
/// keep a zero extent so straight lines stay straight.
fn resized(layer: &Layer, scale_x: f64, scale_y: f64) -> (f64, f64) {
    match layer.kind {
        LayerKind::Line(_) | LayerKind::Arrow(_) | LayerKind::Vector(_) => {
            let clamp = |extent: f64, scale: f64| {
                if extent > 0.0 {
                    (extent * scale).max(MIN_TRANSFORM_SIZE)
                } else {
                    extent
                }
            };
            (clamp(layer.width, scale_x), clamp(layer.height, scale_y))
        }
        LayerKind::Ellipse => (
            (layer.width * scale_x).max(MIN_TRANSFORM_SIZE),
            (layer.height * scale_y).max(MIN_ELLIPSE_HEIGHT),
        ),
        _ => (
            (layer.width * scale_x).max(MIN_TRANSFORM_SIZE),
            (layer.height * scale_y).max(MIN_TRANSFORM_SIZE),
        ),
    }
}

/// Factor taking `from` to `to`; 1 for an empty extent.
fn stretch(from: f64, to: f64) -> f64 {
    if from > 0.0 { to / from } else { 1.0 }
}

/// Move `layer` to `(x, y)` and scale its size and drawn points.
fn scaled_patch(layer: &Layer, x: f64, y: f64, fx: f64, fy: f64) -> LayerPatch {
    let mut patch = LayerPatch::geometry(x, y, layer.width * fx, layer.height * fy);
    match &layer.kind {
        LayerKind::Line(line) | LayerKind::Arrow(line) => {
            let mut line = line.clone();
            line.scale(fx, fy);
            patch.points = Some(line.points);
        }
        LayerKind::Vector(vector) => {
            let mut vector = vector.clone();
            vector.scale(fx, fy);
            patch.vector_points = Some(vector.points);
        }
        _ => {}
    }
    patch
}

fn scale_children(store: &mut DocumentStore, id: &LayerId, fx: f64, fy: f64, visited: &mut HashSet<LayerId>) {
    if !visited.insert(id.clone()) {
        return;
    }
    let children = store.layer(id).map(|l| l.children().to_vec()).unwrap_or_default();
    for child in children {
        let Some(layer) = store.layer(&child) else {
            continue;
        };
        let patch = scaled_patch(layer, layer.x * fx, layer.y * fy, fx, fy);
        store.update_layer(&child, &patch);
        scale_children(store, &child, fx, fy, visited);
    }
}

/// Pointer/keyboard interpreter for the canvas.
pub struct CanvasInput {
    state: ToolState,
    /// Tool that owns `state`.
    active_tool: ToolKind,
    frame_picker: Option<FramePresetPicker>,
    hit_tester: Box<dyn HitTester>,
}

impl Default for CanvasInput {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CanvasInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasInput")
            .field("state", &self.state)
            .field("active_tool", &self.active_tool)
            .field("frame_picker", &self.frame_picker)
            .finish()
    }
}

impl CanvasInput {
    pub fn new() -> Self {
        Self::with_hit_tester(BoundsHitTester::default())
    }

    /// Input handler hit testing with the configured tolerance.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_hit_tester(BoundsHitTester::new(config.hit_tolerance))
    }

    pub fn with_hit_tester(hit_tester: impl HitTester + 'static) -> Self {
        Self {
            state: ToolState::Idle,
            active_tool: ToolKind::default(),
            frame_picker: None,
            hit_tester: Box::new(hit_tester),
        }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Shape being dragged out, for preview rendering.
    pub fn draft(&self) -> Option<&Layer> {
        match &self.state {
            ToolState::Drawing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Points captured by the pen tool so far.
    pub fn pen_points(&self) -> &[Point] {
        match &self.state {
            ToolState::PenPath { points } => points,
            _ => &[],
        }
    }

    pub fn frame_picker(&self) -> Option<&FramePresetPicker> {
        self.frame_picker.as_ref()
    }

    /// Drop any in-progress interaction.
    pub fn cancel(&mut self, store: &mut DocumentStore) {
        if let ToolState::Moving { .. } = self.state {
            store.end_gesture();
        }
        if !self.state.is_idle() {
            log::debug!("Cancel {} interaction", self.active_tool);
        }
        self.state = ToolState::Idle;
        self.frame_picker = None;
    }

    /// Switch tools, abandoning whatever the previous tool was doing.
    pub fn set_tool(&mut self, store: &mut DocumentStore, tool: ToolKind) {
        self.cancel(store);
        self.active_tool = tool;
        store.set_tool(tool);
    }

    fn sync_tool(&mut self, store: &mut DocumentStore) {
        if self.active_tool != store.current_tool() {
            self.cancel(store);
            self.active_tool = store.current_tool();
        }
    }

    /// Expire the frame preset picker. Returns `true` if it was dismissed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self.frame_picker.as_ref().is_some_and(|p| p.is_expired(now));
        if expired {
            log::debug!("Frame preset picker timed out");
            self.frame_picker = None;
        }
        expired
    }

    /// Commit a frame of the named preset at the picker's anchor.
    pub fn choose_frame_preset(&mut self, store: &mut DocumentStore, name: &str) -> Option<LayerId> {
        let preset = FramePreset::find(name)?;
        let picker = self.frame_picker.take()?;
        Some(store.add_layer(picker.build(&preset)))
    }

    pub fn handle_pointer(&mut self, store: &mut DocumentStore, event: &PointerEvent) {
        self.handle_pointer_at(store, event, Instant::now());
    }

    /// Like [`handle_pointer`](Self::handle_pointer) with an explicit clock.
    pub fn handle_pointer_at(&mut self, store: &mut DocumentStore, event: &PointerEvent, now: Instant) {
        self.sync_tool(store);
        match *event {
            PointerEvent::Wheel { position, delta, .. } => {
                let factor = if delta.y > 0.0 { 1.0 / ZOOM_STEP } else { ZOOM_STEP };
                store.zoom_at(position, factor);
            }
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                click_count,
                modifiers,
            } => self.pointer_down(store, position, click_count, modifiers.shift, modifiers.alt, now),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position, .. } => self.pointer_move(store, position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
                ..
            } => self.pointer_up(store, position),
            PointerEvent::Up { .. } => {}
        }
    }

    fn pointer_down(
        &mut self,
        store: &mut DocumentStore,
        screen: Point,
        click_count: u32,
        shift: bool,
        alt: bool,
        now: Instant,
    ) {
        if let ToolState::Moving { .. } = self.state {
            log::debug!("Pointer down while moving; closing the previous gesture");
            store.end_gesture();
            self.state = ToolState::Idle;
        }
        let world = store.canvas().screen_to_world(screen);
        match self.active_tool {
            ToolKind::Select => self.select_down(store, world, shift),
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Line | ToolKind::Arrow => {
                if let Some(draft) = begin_draft(self.active_tool, world) {
                    self.state = ToolState::Drawing { anchor: world, draft };
                }
            }
            ToolKind::Text => {
                store.add_layer(Layer::text(world.x, world.y, DEFAULT_TEXT));
            }
            ToolKind::Frame => {
                let timeout = Duration::from_millis(store.config().frame_picker_timeout_ms);
                self.frame_picker = Some(FramePresetPicker::open(world, now, timeout));
            }
            ToolKind::Pen => self.pen_click(store, world, click_count),
            ToolKind::Hand => {
                self.state = ToolState::Panning { last: screen };
            }
            ToolKind::Zoom => {
                let factor = if alt { 1.0 / ZOOM_STEP } else { ZOOM_STEP };
                store.zoom_at(screen, factor);
            }
        }
    }

    fn select_down(&mut self, store: &mut DocumentStore, world: Point, shift: bool) {
        let Some(hit) = self.hit_tester.hit_test(store.layers(), world) else {
            if !shift {
                store.clear_selection();
            }
            return;
        };

        let was_selected = store.is_selected(&hit);
        if shift {
            store.toggle_selection(&hit);
        } else if !was_selected {
            store.select_layer(&hit);
        }

        if store.is_selected(&hit) {
            store.begin_gesture();
            self.state = ToolState::Moving {
                last: world,
                pressed: hit,
                moved: false,
                collapse: !shift && was_selected && store.selection().len() > 1,
            };
        }
    }

    fn pen_click(&mut self, store: &mut DocumentStore, world: Point, click_count: u32) {
        let mut points = match std::mem::take(&mut self.state) {
            ToolState::PenPath { points } => points,
            _ => Vec::new(),
        };
        if click_count >= 2 && points.len() >= 2 {
            if let Some(layer) = Layer::vector(&points, false) {
                log::debug!("Pen path committed with {} points", points.len());
                store.add_layer(layer);
            }
            return;
        }
        points.push(world);
        self.state = ToolState::PenPath { points };
    }

    fn pointer_move(&mut self, store: &mut DocumentStore, screen: Point) {
        let world = store.canvas().screen_to_world(screen);
        match &mut self.state {
            ToolState::Drawing { anchor, draft } => update_draft(draft, *anchor, world),
            ToolState::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                store.pan_by(delta);
            }
            ToolState::Moving { last, moved, .. } => {
                let delta = world - *last;
                if delta.hypot2() > 0.0 {
                    *last = world;
                    *moved = true;
                    let ids = store.selection().to_vec();
                    store.move_layers(&ids, delta);
                }
            }
            ToolState::Idle | ToolState::PenPath { .. } => {}
        }
    }

    fn pointer_up(&mut self, store: &mut DocumentStore, screen: Point) {
        match std::mem::take(&mut self.state) {
            ToolState::Drawing { anchor, mut draft } => {
                let world = store.canvas().screen_to_world(screen);
                update_draft(&mut draft, anchor, world);
                if should_commit(&draft, store.config().min_draft_size) {
                    store.add_layer(draft);
                } else {
                    log::debug!("Discarded {} draft below minimum size", draft.layer_type());
                }
            }
            ToolState::Moving {
                pressed,
                moved,
                collapse,
                ..
            } => {
                store.end_gesture();
                if !moved && collapse {
                    store.select_layer(&pressed);
                }
            }
            // The pen path survives pointer-up; it ends on double-click.
            state @ ToolState::PenPath { .. } => self.state = state,
            ToolState::Panning { .. } | ToolState::Idle => {}
        }
    }

    /// Apply a keyboard shortcut. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, store: &mut DocumentStore, event: &KeyEvent) -> bool {
        if event.text_focus {
            return false;
        }
        self.sync_tool(store);
        let mods = event.modifiers;

        match event.key {
            Key::Escape => {
                self.cancel(store);
                store.clear_selection();
                true
            }
            Key::Delete | Key::Backspace => store.delete_selected(),
            Key::Enter => false,
            Key::Char(c) if mods.is_command() => self.command_shortcut(store, c, mods.shift),
            Key::Char(c) if !mods.alt => match ToolKind::from_shortcut(c) {
                Some(tool) => {
                    self.set_tool(store, tool);
                    true
                }
                None => false,
            },
            Key::Char(_) => false,
        }
    }

    fn command_shortcut(&mut self, store: &mut DocumentStore, key: char, shift: bool) -> bool {
        match (key.to_ascii_lowercase(), shift) {
            ('z', false) => store.undo(),
            ('z', true) | ('y', false) => store.redo(),
            ('d', false) => match store.selection() {
                [only] => {
                    let id = only.clone();
                    store.duplicate_layer(&id).is_some()
                }
                _ => false,
            },
            ('g', false) => {
                let ids = store.selection().to_vec();
                ids.len() >= 2 && store.group_layers(&ids).is_some()
            }
            ('g', true) => match store.selection() {
                [only] => {
                    let id = only.clone();
                    store.ungroup_layer(&id).is_some()
                }
                _ => false,
            },
            ('c', false) => store.copy(),
            ('x', false) => store.cut(),
            ('v', false) => store.paste().is_some(),
            ('a', false) => {
                store.select_all();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::layers::{LayerType, VectorPoint};
    use kurbo::{Rect, Vec2};

    fn setup(tool: ToolKind) -> (DocumentStore, CanvasInput) {
        let mut store = DocumentStore::new();
        let mut input = CanvasInput::new();
        input.set_tool(&mut store, tool);
        (store, input)
    }

    fn drag(store: &mut DocumentStore, input: &mut CanvasInput, from: (f64, f64), to: (f64, f64)) {
        input.handle_pointer(store, &PointerEvent::down(from.0, from.1));
        input.handle_pointer(store, &PointerEvent::moved(to.0, to.1));
        input.handle_pointer(store, &PointerEvent::up(to.0, to.1));
    }

    #[test]
    fn test_rectangle_drag_commits_normalized_box() {
        let (mut store, mut input) = setup(ToolKind::Rectangle);
        input.handle_pointer(&mut store, &PointerEvent::down(100.0, 100.0));
        input.handle_pointer(&mut store, &PointerEvent::moved(50.0, 180.0));
        assert!(store.layers().is_empty());
        assert_eq!(input.draft().map(Layer::bounds), Some(Rect::new(50.0, 100.0, 100.0, 180.0)));

        input.handle_pointer(&mut store, &PointerEvent::up(50.0, 180.0));
        assert_eq!(store.layers().len(), 1);
        assert_eq!(store.layers()[0].bounds(), Rect::new(50.0, 100.0, 100.0, 180.0));
        assert_eq!(store.selection(), std::slice::from_ref(&store.layers()[0].id));
        assert_eq!(store.current_tool(), ToolKind::Rectangle);
        assert!(input.state().is_idle());
    }

    #[test]
    fn test_tiny_ellipse_discarded() {
        let (mut store, mut input) = setup(ToolKind::Ellipse);
        drag(&mut store, &mut input, (10.0, 10.0), (14.0, 13.0));
        assert!(store.layers().is_empty());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_zero_size_line_commits() {
        let (mut store, mut input) = setup(ToolKind::Line);
        input.handle_pointer(&mut store, &PointerEvent::down(10.0, 10.0));
        input.handle_pointer(&mut store, &PointerEvent::up(10.0, 10.0));
        assert_eq!(store.layers().len(), 1);
        assert_eq!(store.layers()[0].layer_type(), LayerType::Line);
    }

    #[test]
    fn test_arrow_keeps_anchor_origin() {
        let (mut store, mut input) = setup(ToolKind::Arrow);
        drag(&mut store, &mut input, (100.0, 100.0), (60.0, 130.0));
        let arrow = &store.layers()[0];
        assert_eq!(arrow.position(), Point::new(100.0, 100.0));
        assert!((arrow.width - 40.0).abs() < f64::EPSILON);
        match &arrow.kind {
            LayerKind::Arrow(line) => {
                assert_eq!(line.points, vec![0.0, 0.0, -40.0, 30.0]);
                assert!(line.arrow_end);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_drawing_respects_viewport() {
        let (mut store, mut input) = setup(ToolKind::Rectangle);
        store.set_zoom(2.0);
        store.set_offset(Vec2::new(100.0, 0.0));
        drag(&mut store, &mut input, (100.0, 0.0), (200.0, 100.0));
        assert_eq!(store.layers()[0].bounds(), Rect::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_text_tool_commits_on_click() {
        let (mut store, mut input) = setup(ToolKind::Text);
        input.handle_pointer(&mut store, &PointerEvent::down(30.0, 40.0));
        let text = &store.layers()[0];
        assert_eq!(text.position(), Point::new(30.0, 40.0));
        match &text.kind {
            LayerKind::Text(props) => assert_eq!(props.text, DEFAULT_TEXT),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_frame_picker_flow() {
        let (mut store, mut input) = setup(ToolKind::Frame);
        let start = Instant::now();
        input.handle_pointer_at(&mut store, &PointerEvent::down(20.0, 30.0), start);
        assert!(input.frame_picker().is_some());
        assert!(store.layers().is_empty());

        assert!(!input.tick(start + Duration::from_secs(1)));
        let id = input.choose_frame_preset(&mut store, "iPhone 14").unwrap();
        let frame = store.layer(&id).unwrap();
        assert_eq!(frame.bounds(), Rect::new(20.0, 30.0, 410.0, 874.0));
        assert!(input.frame_picker().is_none());
    }

    #[test]
    fn test_frame_picker_times_out() {
        let (mut store, mut input) = setup(ToolKind::Frame);
        let start = Instant::now();
        input.handle_pointer_at(&mut store, &PointerEvent::down(0.0, 0.0), start);
        assert!(input.tick(start + Duration::from_secs(3)));
        assert!(input.choose_frame_preset(&mut store, "Desktop").is_none());
        assert!(store.layers().is_empty());
    }

    #[test]
    fn test_pen_double_click_commits_relative_points() {
        let (mut store, mut input) = setup(ToolKind::Pen);
        for (x, y) in [(100.0, 50.0), (140.0, 20.0), (120.0, 90.0)] {
            input.handle_pointer(&mut store, &PointerEvent::down(x, y));
            input.handle_pointer(&mut store, &PointerEvent::up(x, y));
        }
        assert_eq!(input.pen_points().len(), 3);
        input.handle_pointer(&mut store, &PointerEvent::double_down(120.0, 90.0));

        assert!(input.state().is_idle());
        let vector = &store.layers()[0];
        assert_eq!(vector.bounds(), Rect::new(100.0, 20.0, 140.0, 90.0));
        match &vector.kind {
            LayerKind::Vector(props) => {
                assert!(!props.closed);
                assert_eq!(props.points[0], VectorPoint::corner(0.0, 30.0));
                assert_eq!(props.points[2], VectorPoint::corner(20.0, 70.0));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_pen_escape_abandons_path() {
        let (mut store, mut input) = setup(ToolKind::Pen);
        input.handle_pointer(&mut store, &PointerEvent::down(0.0, 0.0));
        input.handle_pointer(&mut store, &PointerEvent::down(10.0, 10.0));
        assert!(input.handle_key(&mut store, &KeyEvent::new(Key::Escape)));
        assert!(input.pen_points().is_empty());
        input.handle_pointer(&mut store, &PointerEvent::double_down(10.0, 10.0));
        assert!(store.layers().is_empty());
    }

    #[test]
    fn test_hand_tool_pans_one_to_one() {
        let (mut store, mut input) = setup(ToolKind::Hand);
        store.set_zoom(2.0);
        drag(&mut store, &mut input, (10.0, 10.0), (40.0, -5.0));
        assert_eq!(store.canvas().offset, Vec2::new(30.0, -15.0));
        assert!(input.state().is_idle());
    }

    #[test]
    fn test_wheel_zoom_to_cursor() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let cursor = Point::new(100.0, 100.0);
        let world = store.canvas().screen_to_world(cursor);

        input.handle_pointer(&mut store, &PointerEvent::wheel(100.0, 100.0, -1.0));
        assert!((store.canvas().zoom - 1.1).abs() < 1e-10);
        let screen = store.canvas().world_to_screen(world);
        assert!((screen.x - 100.0).abs() < 1e-9 && (screen.y - 100.0).abs() < 1e-9);

        input.handle_pointer(&mut store, &PointerEvent::wheel(100.0, 100.0, 5.0));
        assert!((store.canvas().zoom - 1.0).abs() < 1e-10);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_zoom_tool_alt_zooms_out() {
        let (mut store, mut input) = setup(ToolKind::Zoom);
        input.handle_pointer(&mut store, &PointerEvent::down(0.0, 0.0));
        assert!((store.canvas().zoom - 1.1).abs() < 1e-10);
        input.handle_pointer(&mut store, &PointerEvent::down(0.0, 0.0).with_modifiers(Modifiers::alt()));
        assert!((store.canvas().zoom - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_select_click_and_shift_toggle() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 50.0, 50.0));
        let b = store.add_layer(Layer::rectangle(100.0, 0.0, 50.0, 50.0));
        store.clear_selection();

        input.handle_pointer(&mut store, &PointerEvent::down(10.0, 10.0));
        input.handle_pointer(&mut store, &PointerEvent::up(10.0, 10.0));
        assert_eq!(store.selection(), std::slice::from_ref(&a));

        let shift_click = PointerEvent::down(110.0, 10.0).with_modifiers(Modifiers::shift());
        input.handle_pointer(&mut store, &shift_click);
        input.handle_pointer(&mut store, &PointerEvent::up(110.0, 10.0));
        assert_eq!(store.selection(), &[a.clone(), b.clone()]);

        // A plain click on a member of a multi-selection narrows it on release.
        input.handle_pointer(&mut store, &PointerEvent::down(110.0, 10.0));
        input.handle_pointer(&mut store, &PointerEvent::up(110.0, 10.0));
        assert_eq!(store.selection(), std::slice::from_ref(&b));

        input.handle_pointer(&mut store, &PointerEvent::down(500.0, 500.0));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_drag_moves_selection_in_one_step() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 50.0, 50.0));
        let b = store.add_layer(Layer::rectangle(100.0, 0.0, 50.0, 50.0));
        store.select_layers(&[a.clone(), b.clone()]);
        let history = store.history().len();

        input.handle_pointer(&mut store, &PointerEvent::down(10.0, 10.0));
        for step in 1..=5 {
            input.handle_pointer(&mut store, &PointerEvent::moved(10.0 + step as f64 * 4.0, 10.0));
        }
        input.handle_pointer(&mut store, &PointerEvent::up(30.0, 10.0));

        assert_eq!(store.layer(&a).unwrap().position(), Point::new(20.0, 0.0));
        assert_eq!(store.layer(&b).unwrap().position(), Point::new(120.0, 0.0));
        assert_eq!(store.selection(), &[a.clone(), b]);
        assert_eq!(store.history().len(), history + 1);

        store.undo();
        assert_eq!(store.layer(&a).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_press_without_release_keeps_one_gesture() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 50.0, 50.0));
        let history = store.history().len();

        input.handle_pointer(&mut store, &PointerEvent::down(10.0, 10.0));
        input.handle_pointer(&mut store, &PointerEvent::moved(20.0, 10.0));
        // The release of the first press is lost.
        input.handle_pointer(&mut store, &PointerEvent::down(20.0, 10.0));
        input.handle_pointer(&mut store, &PointerEvent::moved(30.0, 10.0));
        input.handle_pointer(&mut store, &PointerEvent::up(30.0, 10.0));

        assert!(!store.in_gesture());
        assert_eq!(store.layer(&a).unwrap().position(), Point::new(20.0, 0.0));
        assert_eq!(store.history().len(), history + 2);

        store.add_layer(Layer::rectangle(200.0, 0.0, 10.0, 10.0));
        assert_eq!(store.history().len(), history + 3);
        store.undo();
        store.undo();
        assert_eq!(store.layer(&a).unwrap().position(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_locked_layer_is_not_hit() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 50.0, 50.0));
        store.update_layer(&a, &LayerPatch { locked: Some(true), ..LayerPatch::default() });
        store.clear_selection();
        drag(&mut store, &mut input, (10.0, 10.0), (40.0, 40.0));
        assert!(store.selection().is_empty());
        assert_eq!(store.layer(&a).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_transform_end_bakes_scale() {
        let mut store = DocumentStore::new();
        let rect = store.add_layer(Layer::rectangle(0.0, 0.0, 100.0, 50.0));
        let ellipse = store.add_layer(Layer::ellipse(0.0, 0.0, 40.0, 40.0));
        let history = store.history().len();

        let resets = transform_end(
            &mut store,
            &[
                TransformCommit {
                    id: rect.clone(),
                    x: 10.0,
                    y: 20.0,
                    rotation: 45.0,
                    scale_x: 2.0,
                    scale_y: 0.01,
                },
                TransformCommit {
                    id: ellipse.clone(),
                    x: 0.0,
                    y: 0.0,
                    rotation: 0.0,
                    scale_x: 0.5,
                    scale_y: 0.1,
                },
            ],
        );

        let r = store.layer(&rect).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height, r.rotation), (10.0, 20.0, 200.0, 5.0, 45.0));
        let e = store.layer(&ellipse).unwrap();
        assert_eq!((e.width, e.height), (20.0, 10.0));
        assert_eq!(resets.len(), 2);
        assert!(resets.iter().all(|r| r.scale_x == 1.0 && r.scale_y == 1.0));
        assert_eq!(store.history().len(), history + 1);
    }

    fn commit(id: &LayerId, x: f64, y: f64, scale_x: f64, scale_y: f64) -> TransformCommit {
        TransformCommit {
            id: id.clone(),
            x,
            y,
            rotation: 0.0,
            scale_x,
            scale_y,
        }
    }

    #[test]
    fn test_transform_end_stretches_line_points() {
        let mut store = DocumentStore::new();
        let line = store.add_layer(Layer::line(0.0, 0.0, 100.0, 0.0));
        let arrow = store.add_layer(Layer::arrow(10.0, 10.0, 40.0, -30.0));

        transform_end(&mut store, &[commit(&line, 0.0, 0.0, 2.0, 3.0), commit(&arrow, 10.0, 10.0, 0.5, 2.0)]);

        let l = store.layer(&line).unwrap();
        assert_eq!(l.bounds(), Rect::new(0.0, 0.0, 200.0, 0.0));
        assert_eq!((l.width, l.height), (200.0, 0.0));

        let a = store.layer(&arrow).unwrap();
        match &a.kind {
            LayerKind::Arrow(props) => assert_eq!(props.points, vec![0.0, 0.0, 20.0, -60.0]),
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!((a.width, a.height), (20.0, 60.0));
        assert_eq!(a.bounds(), Rect::new(10.0, -50.0, 30.0, 10.0));
    }

    #[test]
    fn test_transform_end_stretches_vector_points() {
        let mut store = DocumentStore::new();
        let world = [Point::new(0.0, 0.0), Point::new(100.0, 50.0), Point::new(50.0, 100.0)];
        let path = store.add_layer(Layer::vector(&world, true).unwrap());

        transform_end(&mut store, &[commit(&path, 0.0, 0.0, 2.0, 0.5)]);

        let layer = store.layer(&path).unwrap();
        assert_eq!((layer.width, layer.height), (200.0, 50.0));
        match &layer.kind {
            LayerKind::Vector(props) => {
                let points: Vec<Point> = props.points.iter().map(VectorPoint::position).collect();
                assert_eq!(points, vec![Point::ZERO, Point::new(200.0, 25.0), Point::new(100.0, 50.0)]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_transform_end_scales_group_children() {
        let mut store = DocumentStore::new();
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 100.0, 100.0));
        let b = store.add_layer(Layer::line(100.0, 100.0, 100.0, 100.0));
        let group = store.group_layers(&[a.clone(), b.clone()]).unwrap();
        let history = store.history().len();

        transform_end(&mut store, &[commit(&group, 0.0, 0.0, 0.5, 0.5)]);

        let g = store.layer(&group).unwrap();
        assert_eq!((g.width, g.height), (100.0, 100.0));
        assert_eq!(store.absolute_bounds(&a), Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(store.absolute_bounds(&b), Some(Rect::new(50.0, 50.0, 100.0, 100.0)));
        assert_eq!(store.history().len(), history + 1);
    }

    #[test]
    fn test_shortcuts_switch_tools() {
        let (mut store, mut input) = setup(ToolKind::Select);
        for (key, tool) in [('r', ToolKind::Rectangle), ('o', ToolKind::Ellipse), ('h', ToolKind::Hand), ('v', ToolKind::Select)] {
            assert!(input.handle_key(&mut store, &KeyEvent::char(key)));
            assert_eq!(store.current_tool(), tool);
        }
        assert!(!input.handle_key(&mut store, &KeyEvent::char('q')));
    }

    #[test]
    fn test_shortcuts_suppressed_in_text_field() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let id = store.add_layer(Layer::rectangle(0.0, 0.0, 10.0, 10.0));
        assert!(!input.handle_key(&mut store, &KeyEvent::new(Key::Backspace).in_text_field()));
        assert!(!input.handle_key(&mut store, &KeyEvent::char('r').in_text_field()));
        assert!(store.contains(&id));
        assert_eq!(store.current_tool(), ToolKind::Select);
    }

    #[test]
    fn test_edit_shortcuts() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 10.0, 10.0));

        assert!(input.handle_key(&mut store, &KeyEvent::command('d')));
        assert_eq!(store.layers().len(), 2);

        assert!(input.handle_key(&mut store, &KeyEvent::command('a')));
        assert!(input.handle_key(&mut store, &KeyEvent::command('g')));
        let group = store.selection()[0].clone();
        assert!(store.layer(&group).unwrap().is_group());

        let ungroup = KeyEvent::command('g').with_modifiers(Modifiers::command().with_shift());
        assert!(input.handle_key(&mut store, &ungroup));
        assert_eq!(store.selection().len(), 2);

        assert!(input.handle_key(&mut store, &KeyEvent::new(Key::Delete)));
        assert!(store.layers().is_empty());

        assert!(input.handle_key(&mut store, &KeyEvent::command('z')));
        assert_eq!(store.layers().len(), 2);
        let redo = KeyEvent::command('z').with_modifiers(Modifiers::command().with_shift());
        assert!(input.handle_key(&mut store, &redo));
        assert!(store.layers().is_empty());
        assert!(!store.contains(&a));
    }

    #[test]
    fn test_duplicate_needs_single_selection() {
        let (mut store, mut input) = setup(ToolKind::Select);
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = store.add_layer(Layer::rectangle(20.0, 0.0, 10.0, 10.0));
        store.select_layers(&[a, b]);
        assert!(!input.handle_key(&mut store, &KeyEvent::command('d')));
        assert_eq!(store.layers().len(), 2);
    }

    #[test]
    fn test_external_tool_change_cancels_draft() {
        let (mut store, mut input) = setup(ToolKind::Rectangle);
        input.handle_pointer(&mut store, &PointerEvent::down(0.0, 0.0));
        input.handle_pointer(&mut store, &PointerEvent::moved(50.0, 50.0));
        store.set_tool(ToolKind::Ellipse);
        input.handle_pointer(&mut store, &PointerEvent::up(50.0, 50.0));
        assert!(store.layers().is_empty());
    }
}
