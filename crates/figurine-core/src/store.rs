//! The document store: single owner of all editor state.
//!
//! Every mutation goes through a method here. Changes to the layer list push
//! a history snapshot; selection, viewport, tool and preference changes do
//! not. Observers either poll [`DocumentStore::revision`] or register a
//! listener with [`DocumentStore::subscribe`].

use crate::config::{EditorConfig, Preferences};
use crate::document::{DEFAULT_FILE_NAME, DocumentError, DocumentFile, download_name};
use crate::geometry::union_bounds;
use crate::history::{History, HistoryState};
use crate::ids::LayerId;
use crate::interaction::{Interaction, InteractionDraft, InteractionError};
use crate::layers::{self, Layer, LayerPatch};
use crate::storage::{LOCAL_SAVE_SLOT, Storage};
use crate::tools::ToolKind;
use crate::viewport::CanvasState;
use kurbo::{Point, Rect, Vec2};
use pollster::block_on;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// What part of the state a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    Layers,
    Selection,
    Canvas,
    Tool,
    Clipboard,
    Interactions,
    /// The whole document was replaced (new/open/undo/redo).
    Document,
    Preferences,
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Change)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Layers captured by copy or cut, plus where the next paste lands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    /// Top-level copied layers, in absolute coordinates.
    roots: Vec<LayerId>,
    /// Roots and every descendant, with their original ids.
    layers: Vec<Layer>,
    offset: Vec2,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[LayerId] {
        &self.roots
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Offset added to the next paste.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Clone `id` and its descendants out of `source` with fresh ids, appending
/// children before their group. Returns the id of the new root.
fn clone_subtree(
    source: &[Layer],
    id: &LayerId,
    out: &mut Vec<Layer>,
    visited: &mut HashSet<LayerId>,
) -> Option<LayerId> {
    if !visited.insert(id.clone()) {
        return None;
    }
    let mut copy = source.iter().find(|l| &l.id == id)?.clone();
    copy.id = LayerId::generate(copy.layer_type().as_str());
    if let Some(group) = copy.as_group_mut() {
        let children = std::mem::take(&mut group.children);
        let mut cloned = Vec::with_capacity(children.len());
        for child in &children {
            if let Some(new_id) = clone_subtree(source, child, out, visited) {
                cloned.push(new_id);
            }
        }
        if let Some(group) = copy.as_group_mut() {
            group.children = cloned;
        }
    }
    let new_id = copy.id.clone();
    out.push(copy);
    Some(new_id)
}

/// Collect `id` and everything under it into `into`.
fn collect_subtree(layers: &[Layer], id: &LayerId, into: &mut HashSet<LayerId>) {
    if !into.insert(id.clone()) {
        return;
    }
    if let Some(layer) = layers.iter().find(|l| &l.id == id) {
        for child in layer.children() {
            collect_subtree(layers, child, into);
        }
    }
}

/// Authoritative editor state.
pub struct DocumentStore {
    layers: Arc<Vec<Layer>>,
    selection: Vec<LayerId>,
    canvas: CanvasState,
    current_tool: ToolKind,
    clipboard: Clipboard,
    interactions: Vec<Interaction>,
    preferences: Preferences,
    history: History,
    gesture_depth: usize,
    gesture_dirty: bool,
    document_id: String,
    file_name: String,
    config: EditorConfig,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("file_name", &self.file_name)
            .field("layers", &self.layers.len())
            .field("selection", &self.selection)
            .field("canvas", &self.canvas)
            .field("current_tool", &self.current_tool)
            .field("history_index", &self.history.index())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let mut store = Self {
            layers: Arc::new(Vec::new()),
            selection: Vec::new(),
            canvas: CanvasState::default(),
            current_tool: ToolKind::default(),
            clipboard: Clipboard::default(),
            interactions: Vec::new(),
            preferences: Preferences::default(),
            history: History::new(config.history_capacity),
            gesture_depth: 0,
            gesture_dirty: false,
            document_id: Uuid::new_v4().to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            config,
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        store.reset_history();
        store
    }

    // --- observation -------------------------------------------------------

    /// Monotonic counter bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: Change) {
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }

    // --- history -----------------------------------------------------------

    fn snapshot(&self) -> HistoryState {
        HistoryState {
            layers: Arc::clone(&self.layers),
            selection: self.selection.clone(),
            canvas: self.canvas,
        }
    }

    fn reset_history(&mut self) {
        self.gesture_depth = 0;
        self.gesture_dirty = false;
        let baseline = self.snapshot();
        self.history.reset(baseline);
    }

    fn record(&mut self) {
        if self.gesture_depth > 0 {
            self.gesture_dirty = true;
            return;
        }
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn restore(&mut self, state: HistoryState) {
        self.layers = state.layers;
        self.selection = state.selection;
        self.canvas = state.canvas;
        self.notify(Change::Document);
    }

    /// Start an interactive gesture; mutations until the matching
    /// [`end_gesture`](Self::end_gesture) collapse into one undo step.
    pub fn begin_gesture(&mut self) {
        self.gesture_depth += 1;
    }

    pub fn end_gesture(&mut self) {
        if self.gesture_depth == 0 {
            return;
        }
        self.gesture_depth -= 1;
        if self.gesture_depth == 0 && self.gesture_dirty {
            self.gesture_dirty = false;
            self.record();
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_depth > 0
    }

    fn finish_pending_gesture(&mut self) {
        if self.gesture_depth > 0 {
            log::warn!("Closing unfinished gesture before history navigation");
            self.gesture_depth = 1;
            self.end_gesture();
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.finish_pending_gesture();
        match self.history.undo().cloned() {
            Some(state) => {
                log::debug!("Undo to history index {:?}", self.history.index());
                self.restore(state);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_pending_gesture();
        match self.history.redo().cloned() {
            Some(state) => {
                log::debug!("Redo to history index {:?}", self.history.index());
                self.restore(state);
                true
            }
            None => false,
        }
    }

    // --- queries -----------------------------------------------------------

    /// Editor configuration the store was built with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// All layers in paint order, group children included.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Shared handle to the current layer list.
    pub fn layers_arc(&self) -> Arc<Vec<Layer>> {
        Arc::clone(&self.layers)
    }

    /// Whether `other` is still the current layer list (no change since it was
    /// taken).
    pub fn layers_ptr_eq(&self, other: &Arc<Vec<Layer>>) -> bool {
        Arc::ptr_eq(&self.layers, other)
    }

    /// Layer by id, wherever it sits in the tree.
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    /// Whether a layer with this id exists.
    pub fn contains(&self, id: &LayerId) -> bool {
        self.layer(id).is_some()
    }

    fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    /// Layers not owned by any group, bottom to top.
    pub fn root_layers(&self) -> Vec<&Layer> {
        layers::root_layers(&self.layers)
    }

    /// The group listing `id` as a child, if any.
    pub fn parent_of(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.children().contains(id))
    }

    /// World position of a layer, resolving group-relative coordinates.
    pub fn absolute_position(&self, id: &LayerId) -> Option<Point> {
        let layer = self.layer(id)?;
        let mut position = layer.position();
        let mut current = id.clone();
        // Bounded walk; a malformed file could contain a cycle.
        for _ in 0..self.layers.len() {
            match self.parent_of(&current) {
                Some(parent) => {
                    position += parent.position().to_vec2();
                    current = parent.id.clone();
                }
                None => break,
            }
        }
        Some(position)
    }

    /// Bounds of a layer in world coordinates.
    pub fn absolute_bounds(&self, id: &LayerId) -> Option<Rect> {
        let layer = self.layer(id)?;
        let offset = self.absolute_position(id)? - layer.position();
        Some(layer.bounds() + offset)
    }

    /// Selected ids in selection order.
    pub fn selection(&self) -> &[LayerId] {
        &self.selection
    }

    /// Whether `id` is part of the selection.
    pub fn is_selected(&self, id: &LayerId) -> bool {
        self.selection.contains(id)
    }

    /// Selected layers in selection order, skipping stale ids.
    pub fn selected_layers(&self) -> Vec<&Layer> {
        self.selection.iter().filter_map(|id| self.layer(id)).collect()
    }

    /// World-space union of the selected layers' boxes.
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selection
            .iter()
            .filter_map(|id| self.absolute_bounds(id))
            .reduce(|acc, b| acc.union(b))
    }

    /// Current zoom and pan.
    pub fn canvas(&self) -> CanvasState {
        self.canvas
    }

    /// Tool chosen in the toolbar.
    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    /// Layers held by the last copy or cut.
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Settings-panel toggles.
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Document name used for downloads.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Id of the open document, kept across saves.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    // --- layer mutations ---------------------------------------------------

    /// Append `layer` on top and select it.
    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = layer.id.clone();
        log::debug!("Add {} {}", layer.layer_type(), id);
        Arc::make_mut(&mut self.layers).push(layer);
        self.selection = vec![id.clone()];
        self.record();
        self.notify(Change::Layers);
        id
    }

    /// Remove a layer; groups take their descendants with them.
    pub fn delete_layer(&mut self, id: &LayerId) -> bool {
        self.delete_layers(std::slice::from_ref(id))
    }

    /// Remove several layers as one undo step.
    pub fn delete_layers(&mut self, ids: &[LayerId]) -> bool {
        let mut doomed = HashSet::new();
        for id in ids.iter().filter(|id| self.contains(id)) {
            collect_subtree(&self.layers, id, &mut doomed);
        }
        if doomed.is_empty() {
            return false;
        }
        log::debug!("Delete {} layer(s)", doomed.len());

        let layers = Arc::make_mut(&mut self.layers);
        layers.retain(|l| !doomed.contains(&l.id));
        for layer in layers.iter_mut() {
            if let Some(group) = layer.as_group_mut() {
                group.children.retain(|c| !doomed.contains(c));
            }
        }
        self.selection.retain(|id| !doomed.contains(id));
        self.record();
        self.notify(Change::Layers);
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        let ids = self.selection.clone();
        self.delete_layers(&ids)
    }

    /// Merge `patch` into the layer. No-op for unknown ids.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        patch.apply(&mut Arc::make_mut(&mut self.layers)[index]);
        self.record();
        self.notify(Change::Layers);
        true
    }

    /// Translate several layers as one undo step.
    pub fn move_layers(&mut self, ids: &[LayerId], delta: Vec2) -> bool {
        let targets: HashSet<&LayerId> = ids.iter().collect();
        if targets.is_empty() || !self.layers.iter().any(|l| targets.contains(&l.id)) {
            return false;
        }
        for layer in Arc::make_mut(&mut self.layers)
            .iter_mut()
            .filter(|l| targets.contains(&l.id))
        {
            layer.translate(delta);
        }
        self.record();
        self.notify(Change::Layers);
        true
    }

    /// Deep copy of a layer (and its descendants) offset by the duplicate
    /// offset, appended on top and selected.
    pub fn duplicate_layer(&mut self, id: &LayerId) -> Option<LayerId> {
        let origin = self.absolute_position(id)?;
        let mut cloned = Vec::new();
        let new_id = clone_subtree(&self.layers, id, &mut cloned, &mut HashSet::new())?;
        if let Some(root) = cloned.iter_mut().find(|l| l.id == new_id) {
            root.set_position(origin + self.config.duplicate_offset);
        }
        log::debug!("Duplicate {} as {}", id, new_id);

        Arc::make_mut(&mut self.layers).extend(cloned);
        self.selection = vec![new_id.clone()];
        self.record();
        self.notify(Change::Layers);
        Some(new_id)
    }

    /// Group at least two root layers. Children move into group-relative
    /// coordinates.
    pub fn group_layers(&mut self, ids: &[LayerId]) -> Option<LayerId> {
        let mut members: Vec<LayerId> = Vec::new();
        {
            let owned = layers::child_ids(&self.layers);
            for id in ids {
                if self.contains(id) && !owned.contains(id) && !members.contains(id) {
                    members.push(id.clone());
                }
            }
        }
        if members.len() < 2 {
            return None;
        }
        let bounds = union_bounds(members.iter().filter_map(|id| self.layer(id)))?;
        let origin = Vec2::new(bounds.x0, bounds.y0);

        let layers = Arc::make_mut(&mut self.layers);
        for layer in layers.iter_mut().filter(|l| members.contains(&l.id)) {
            layer.translate(-origin);
        }
        let group = Layer::group(members, bounds);
        let group_id = group.id.clone();
        log::debug!("Group {} layer(s) into {}", group.children().len(), group_id);
        layers.push(group);

        self.selection = vec![group_id.clone()];
        self.record();
        self.notify(Change::Layers);
        Some(group_id)
    }

    /// Dissolve a group, moving its children back to the group's parent space
    /// and selecting them. A nested group hands its children to its parent
    /// group at its own slot.
    pub fn ungroup_layer(&mut self, id: &LayerId) -> Option<Vec<LayerId>> {
        let index = self.index_of(id)?;
        let group = &self.layers[index];
        let children = group.as_group()?.children.clone();
        let origin = group.position().to_vec2();
        let parent = self.parent_of(id).map(|p| p.id.clone());

        let layers = Arc::make_mut(&mut self.layers);
        layers.remove(index);
        for layer in layers.iter_mut().filter(|l| children.contains(&l.id)) {
            layer.translate(origin);
        }
        let children: Vec<LayerId> = children
            .into_iter()
            .filter(|c| layers.iter().any(|l| &l.id == c))
            .collect();
        let parent = parent.and_then(|parent| {
            layers
                .iter_mut()
                .find(|l| l.id == parent)
                .and_then(Layer::as_group_mut)
        });
        if let Some(group) = parent {
            if let Some(slot) = group.children.iter().position(|c| c == id) {
                group.children.splice(slot..=slot, children.iter().cloned());
            }
        }
        log::debug!("Ungroup {} ({} children)", id, children.len());

        self.selection = children.clone();
        self.record();
        self.notify(Change::Layers);
        Some(children)
    }

    fn reorder(&mut self, id: &LayerId, target: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Some(to) = target(index, self.layers.len()) else {
            return false;
        };
        if to == index {
            return false;
        }
        let layers = Arc::make_mut(&mut self.layers);
        let layer = layers.remove(index);
        layers.insert(to, layer);
        self.record();
        self.notify(Change::Layers);
        true
    }

    pub fn bring_to_front(&mut self, id: &LayerId) -> bool {
        self.reorder(id, |_, len| Some(len - 1))
    }

    pub fn bring_forward(&mut self, id: &LayerId) -> bool {
        self.reorder(id, |i, len| (i + 1 < len).then_some(i + 1))
    }

    pub fn send_backward(&mut self, id: &LayerId) -> bool {
        self.reorder(id, |i, _| i.checked_sub(1))
    }

    pub fn send_to_back(&mut self, id: &LayerId) -> bool {
        self.reorder(id, |_, _| Some(0))
    }

    /// Line up the selected layers against the selection box, in world
    /// coordinates.
    pub fn align_layers(&mut self, alignment: Alignment) -> bool {
        let boxes: Vec<(LayerId, Rect)> = self
            .selection
            .iter()
            .filter_map(|id| Some((id.clone(), self.absolute_bounds(id)?)))
            .collect();
        if boxes.len() < 2 {
            return false;
        }
        let Some(target) = boxes.iter().map(|(_, b)| *b).reduce(|acc, b| acc.union(b)) else {
            return false;
        };

        // A world-space offset is the same offset in the parent's space.
        let layers = Arc::make_mut(&mut self.layers);
        for (id, b) in &boxes {
            let delta = match alignment {
                Alignment::Left => Vec2::new(target.x0 - b.x0, 0.0),
                Alignment::Center => Vec2::new(target.center().x - b.center().x, 0.0),
                Alignment::Right => Vec2::new(target.x1 - b.x1, 0.0),
                Alignment::Top => Vec2::new(0.0, target.y0 - b.y0),
                Alignment::Middle => Vec2::new(0.0, target.center().y - b.center().y),
                Alignment::Bottom => Vec2::new(0.0, target.y1 - b.y1),
            };
            if let Some(layer) = layers.iter_mut().find(|l| &l.id == id) {
                layer.translate(delta);
            }
        }
        log::debug!("Align {} layer(s) {:?}", boxes.len(), alignment);
        self.record();
        self.notify(Change::Layers);
        true
    }

    /// Space the selected layers' world origins evenly between the outermost
    /// two.
    ///
    /// Layer extents are not taken into account.
    pub fn distribute_layers(&mut self, axis: Axis) -> bool {
        let along = |p: Point| match axis {
            Axis::Horizontal => p.x,
            Axis::Vertical => p.y,
        };
        let mut ordered: Vec<(LayerId, f64)> = self
            .selection
            .iter()
            .filter_map(|id| Some((id.clone(), along(self.absolute_position(id)?))))
            .collect();
        if ordered.len() < 3 {
            return false;
        }
        ordered.sort_by(|a, b| a.1.total_cmp(&b.1));

        let first = ordered[0].1;
        let last = ordered[ordered.len() - 1].1;
        let gap = (last - first) / (ordered.len() - 1) as f64;

        let layers = Arc::make_mut(&mut self.layers);
        for (i, (id, current)) in ordered.iter().enumerate().skip(1).take(ordered.len() - 2) {
            let offset = first + gap * i as f64 - current;
            let delta = match axis {
                Axis::Horizontal => Vec2::new(offset, 0.0),
                Axis::Vertical => Vec2::new(0.0, offset),
            };
            if let Some(layer) = layers.iter_mut().find(|l| &l.id == id) {
                layer.translate(delta);
            }
        }
        log::debug!("Distribute {} layer(s) {:?}", ordered.len(), axis);
        self.record();
        self.notify(Change::Layers);
        true
    }

    // --- selection ---------------------------------------------------------

    fn set_selection(&mut self, selection: Vec<LayerId>) {
        if selection != self.selection {
            self.selection = selection;
            self.notify(Change::Selection);
        }
    }

    /// Select exactly one layer; an empty or unknown id clears the selection.
    pub fn select_layer(&mut self, id: &LayerId) {
        if id.is_empty() || !self.contains(id) {
            self.set_selection(Vec::new());
        } else {
            self.set_selection(vec![id.clone()]);
        }
    }

    /// Replace the selection, dropping unknown and repeated ids.
    pub fn select_layers(&mut self, ids: &[LayerId]) {
        let mut selection: Vec<LayerId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.contains(id) && !selection.contains(id) {
                selection.push(id.clone());
            }
        }
        self.set_selection(selection);
    }

    pub fn toggle_selection(&mut self, id: &LayerId) {
        if !self.contains(id) {
            return;
        }
        let mut selection = self.selection.clone();
        match selection.iter().position(|s| s == id) {
            Some(i) => {
                selection.remove(i);
            }
            None => selection.push(id.clone()),
        }
        self.set_selection(selection);
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(Vec::new());
    }

    /// Select every root layer.
    pub fn select_all(&mut self) {
        let ids: Vec<LayerId> = self.root_layers().iter().map(|l| l.id.clone()).collect();
        self.set_selection(ids);
    }

    // --- clipboard ---------------------------------------------------------

    /// Selected layers whose ancestors are not selected themselves.
    fn selection_roots(&self) -> Vec<LayerId> {
        let selected: HashSet<&LayerId> = self.selection.iter().collect();
        self.selection
            .iter()
            .filter(|id| self.contains(id))
            .filter(|id| {
                let mut current = (*id).clone();
                for _ in 0..self.layers.len() {
                    match self.parent_of(&current) {
                        Some(parent) if selected.contains(&parent.id) => return false,
                        Some(parent) => current = parent.id.clone(),
                        None => break,
                    }
                }
                true
            })
            .cloned()
            .collect()
    }

    fn capture(&mut self, offset: Vec2) -> bool {
        let roots = self.selection_roots();
        if roots.is_empty() {
            return false;
        }
        let mut wanted = HashSet::new();
        for id in &roots {
            collect_subtree(&self.layers, id, &mut wanted);
        }
        let mut captured: Vec<Layer> = self
            .layers
            .iter()
            .filter(|l| wanted.contains(&l.id))
            .cloned()
            .collect();
        for layer in captured.iter_mut().filter(|l| roots.contains(&l.id)) {
            if let Some(position) = self.absolute_position(&layer.id) {
                layer.set_position(position);
            }
        }
        self.clipboard = Clipboard {
            roots,
            layers: captured,
            offset,
        };
        self.notify(Change::Clipboard);
        true
    }

    /// Copy the selection. Does not touch the document.
    pub fn copy(&mut self) -> bool {
        let copied = self.capture(Vec2::ZERO);
        if copied {
            log::debug!("Copy {} layer(s)", self.clipboard.roots.len());
        }
        copied
    }

    /// Copy the selection, then delete it.
    pub fn cut(&mut self) -> bool {
        if !self.capture(self.config.paste_step) {
            return false;
        }
        log::debug!("Cut {} layer(s)", self.clipboard.roots.len());
        let roots = self.clipboard.roots.clone();
        self.delete_layers(&roots)
    }

    /// Insert fresh copies of the clipboard at its current offset, then bump
    /// the offset for the next paste.
    pub fn paste(&mut self) -> Option<Vec<LayerId>> {
        if self.clipboard.is_empty() {
            return None;
        }
        let offset = self.clipboard.offset;
        let mut pasted = Vec::new();
        let mut new_roots = Vec::new();
        for root in &self.clipboard.roots {
            let mut cloned = Vec::new();
            let Some(new_id) = clone_subtree(&self.clipboard.layers, root, &mut cloned, &mut HashSet::new())
            else {
                continue;
            };
            if let Some(layer) = cloned.iter_mut().find(|l| l.id == new_id) {
                layer.translate(offset);
                if let Some(name) = layer.name.take() {
                    layer.name = Some(format!("{name} Copy"));
                }
            }
            pasted.extend(cloned);
            new_roots.push(new_id);
        }
        log::debug!("Paste {} layer(s) at offset {:?}", new_roots.len(), offset);

        self.clipboard.offset += self.config.paste_step;
        Arc::make_mut(&mut self.layers).extend(pasted);
        self.selection = new_roots.clone();
        self.record();
        self.notify(Change::Layers);
        Some(new_roots)
    }

    // --- viewport, tool, preferences ---------------------------------------

    pub fn set_zoom(&mut self, zoom: f64) {
        self.canvas.set_zoom(zoom);
        self.notify(Change::Canvas);
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.canvas.offset = offset;
        self.notify(Change::Canvas);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.canvas.pan(delta);
        self.notify(Change::Canvas);
    }

    /// Zoom around a screen point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if self.canvas.zoom_at(screen_point, factor) {
            self.notify(Change::Canvas);
        }
    }

    pub fn set_canvas(&mut self, canvas: CanvasState) {
        self.canvas = CanvasState {
            zoom: CanvasState::clamp_zoom(canvas.zoom),
            offset: canvas.offset,
        };
        self.notify(Change::Canvas);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool {} -> {}", self.current_tool, tool);
            self.current_tool = tool;
            self.notify(Change::Tool);
        }
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        if self.preferences != preferences {
            self.preferences = preferences;
            self.notify(Change::Preferences);
        }
    }

    // --- interactions ------------------------------------------------------

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn interactions_for(&self, source: &LayerId) -> Vec<&Interaction> {
        self.interactions.iter().filter(|i| &i.source == source).collect()
    }

    /// Attach an interaction to `source`. The target must be a frame.
    pub fn add_interaction(
        &mut self,
        source: &LayerId,
        draft: InteractionDraft,
    ) -> Result<String, InteractionError> {
        if !self.contains(source) {
            return Err(InteractionError::SourceNotFound(source.clone()));
        }
        let target = self
            .layer(&draft.target)
            .ok_or_else(|| InteractionError::TargetNotFound(draft.target.clone()))?;
        if !target.is_frame() {
            return Err(InteractionError::TargetNotFrame {
                id: target.id.clone(),
                kind: target.layer_type().to_string(),
            });
        }
        let interaction = Interaction::new(source.clone(), draft);
        let id = interaction.id.clone();
        log::debug!("Add interaction {} on {}", id, source);
        self.interactions.push(interaction);
        self.notify(Change::Interactions);
        Ok(id)
    }

    pub fn remove_interaction(&mut self, id: &str) -> bool {
        let before = self.interactions.len();
        self.interactions.retain(|i| i.id != id);
        let removed = self.interactions.len() != before;
        if removed {
            self.notify(Change::Interactions);
        }
        removed
    }

    // --- file operations ---------------------------------------------------

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
        self.notify(Change::Document);
    }

    /// Current document in its serialized form.
    pub fn to_document(&self) -> DocumentFile {
        DocumentFile {
            id: self.document_id.clone(),
            file_name: self.file_name.clone(),
            layers: self.layers.as_ref().clone(),
            interactions: self.interactions.clone(),
            ..DocumentFile::default()
        }
    }

    /// Replace the whole document, clearing selection and history.
    pub fn load_document(&mut self, document: DocumentFile) {
        log::info!(
            "Loaded document '{}' ({} layers, {} interactions)",
            document.file_name,
            document.layers.len(),
            document.interactions.len()
        );
        self.layers = Arc::new(document.layers);
        self.interactions = document.interactions;
        self.file_name = document.file_name;
        self.document_id = document.id;
        self.selection.clear();
        self.canvas = CanvasState::default();
        self.reset_history();
        self.notify(Change::Document);
    }

    pub fn new_file(&mut self) {
        self.load_document(DocumentFile::default());
    }

    /// Parse and load a document. On error the current state is kept.
    pub fn open_file(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = DocumentFile::from_json(json).inspect_err(|e| {
            log::error!("Failed to open document: {}", e);
        })?;
        self.load_document(document);
        Ok(())
    }

    /// Write the document to the local save slot of `storage`.
    pub fn save_file(&self, storage: &dyn Storage) -> Result<(), DocumentError> {
        block_on(storage.save(LOCAL_SAVE_SLOT, &self.to_document()))?;
        log::info!("Saved '{}' to local slot", self.file_name);
        Ok(())
    }

    /// Load the document from the local save slot of `storage`.
    pub fn load_local(&mut self, storage: &dyn Storage) -> Result<(), DocumentError> {
        let document = block_on(storage.load(LOCAL_SAVE_SLOT))?;
        self.load_document(document);
        Ok(())
    }

    /// File name and bytes for a download.
    pub fn save_file_as(&self) -> Result<(String, Vec<u8>), DocumentError> {
        let json = self.to_document().to_json()?;
        Ok((download_name(&self.file_name), json.into_bytes()))
    }
}
