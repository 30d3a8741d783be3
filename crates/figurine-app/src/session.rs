//! Scripted editing sessions.
//!
//! A script is a JSON list of steps (raw input events plus a few store
//! commands a UI panel would issue) replayed against a [`DocumentStore`]
//! through a [`CanvasInput`]. Time only moves on `wait` steps, so the frame
//! preset picker timeout is deterministic.

use anyhow::{Context, Result, bail};
use figurine_core::canvas_input::{TransformCommit, transform_end};
use figurine_core::{
    Alignment, Axis, CanvasInput, DocumentStore, EditorConfig, InteractionDraft, KeyEvent, LayerId,
    LayerPatch, PointerEvent, ToolKind,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

/// Layer stacking command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reorder {
    Front,
    Forward,
    Backward,
    Back,
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    Pointer { event: PointerEvent },
    Key { event: KeyEvent },
    Tool { tool: ToolKind },
    FramePreset { name: String },
    /// Advance the session clock.
    Wait { ms: u64 },
    Transform { commits: Vec<TransformCommit> },
    Update { id: LayerId, patch: LayerPatch },
    Select { ids: Vec<LayerId> },
    Align { alignment: Alignment },
    Distribute { axis: Axis },
    Reorder { id: LayerId, to: Reorder },
    Interaction { source: LayerId, draft: InteractionDraft },
    Rename { name: String },
    Undo,
    Redo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Name given to the document before the steps run.
    #[serde(default)]
    pub file_name: Option<String>,
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script. A bare array is read as the step list.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json).context("Script is not valid JSON")?;
        match value {
            serde_json::Value::Array(_) => Ok(Script {
                file_name: None,
                steps: serde_json::from_value(value).context("Invalid step list")?,
            }),
            serde_json::Value::Object(_) => serde_json::from_value(value).context("Invalid script"),
            _ => bail!("Script must be an object or an array of steps"),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Outcome counts of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    /// Steps that were rejected or had no effect.
    pub ignored: usize,
}

/// Drives a store with scripted steps on a virtual clock.
pub struct Session {
    input: CanvasInput,
    start: Instant,
    elapsed: Duration,
}

impl Session {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            input: CanvasInput::from_config(config),
            start: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn input(&self) -> &CanvasInput {
        &self.input
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    pub fn run(&mut self, store: &mut DocumentStore, script: &Script) -> ReplayReport {
        if let Some(name) = &script.file_name {
            store.set_file_name(name.clone());
        }
        let mut report = ReplayReport::default();
        for (index, step) in script.steps.iter().enumerate() {
            report.steps += 1;
            if !self.apply(store, step) {
                log::debug!("Step {} had no effect: {:?}", index, step);
                report.ignored += 1;
            }
        }
        log::info!(
            "Replayed {} step(s), {} without effect",
            report.steps,
            report.ignored
        );
        report
    }

    /// Apply one step. Returns `false` if it was rejected or did nothing.
    pub fn apply(&mut self, store: &mut DocumentStore, step: &Step) -> bool {
        match step {
            Step::Pointer { event } => {
                let now = self.now();
                self.input.handle_pointer_at(store, event, now);
                true
            }
            Step::Key { event } => self.input.handle_key(store, event),
            Step::Tool { tool } => {
                self.input.set_tool(store, *tool);
                true
            }
            Step::FramePreset { name } => self.input.choose_frame_preset(store, name).is_some(),
            Step::Wait { ms } => {
                self.elapsed += Duration::from_millis(*ms);
                let now = self.now();
                self.input.tick(now);
                true
            }
            Step::Transform { commits } => !transform_end(store, commits).is_empty(),
            Step::Update { id, patch } => store.update_layer(id, patch),
            Step::Select { ids } => {
                store.select_layers(ids);
                store.selection().len() == ids.len()
            }
            Step::Align { alignment } => store.align_layers(*alignment),
            Step::Distribute { axis } => store.distribute_layers(*axis),
            Step::Reorder { id, to } => match to {
                Reorder::Front => store.bring_to_front(id),
                Reorder::Forward => store.bring_forward(id),
                Reorder::Backward => store.send_backward(id),
                Reorder::Back => store.send_to_back(id),
            },
            Step::Interaction { source, draft } => match store.add_interaction(source, draft.clone()) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Interaction rejected: {}", e);
                    false
                }
            },
            Step::Rename { name } => {
                store.set_file_name(name.clone());
                true
            }
            Step::Undo => store.undo(),
            Step::Redo => store.redo(),
        }
    }
}
