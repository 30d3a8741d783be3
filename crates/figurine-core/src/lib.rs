//! Figurine Core Library
//!
//! Platform-agnostic editor state for the Figurine vector design tool: the
//! layer model, the document store with snapshot undo/redo, and the canvas
//! input state machine that drives it.

pub mod canvas_input;
pub mod config;
pub mod document;
pub mod export;
pub mod geometry;
pub mod history;
pub mod ids;
pub mod input;
pub mod interaction;
pub mod layers;
pub mod storage;
pub mod store;
pub mod tools;
pub mod viewport;

pub use canvas_input::{CanvasInput, TransformCommit, TransformReset, transform_end};
pub use config::{EditorConfig, Preferences};
pub use document::{DocumentError, DocumentFile};
pub use export::{ExportFormat, ExportSettings, Exporter};
pub use geometry::{BoundsHitTester, HitTester};
pub use history::{History, HistoryState};
pub use ids::LayerId;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Action, Animation, Interaction, InteractionDraft, Trigger};
pub use layers::{Layer, LayerKind, LayerPatch, LayerType, SerializableColor};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::{Alignment, Axis, Change, DocumentStore, SubscriptionId};
pub use tools::{ToolKind, ToolState};
pub use viewport::CanvasState;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
