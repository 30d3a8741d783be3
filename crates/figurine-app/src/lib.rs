//! Figurine Application
//!
//! Headless shell around the editor core: scripted session replay, document
//! summaries and the keyboard shortcut reference.

mod session;
mod shortcuts;
mod summary;

pub use session::{ReplayReport, Reorder, Script, Session, Step};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use summary::DocumentSummary;

use anyhow::{Context, Result};
use figurine_core::EditorConfig;
use std::path::Path;

/// Read an editor configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}
