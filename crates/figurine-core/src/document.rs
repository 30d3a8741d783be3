//! On-disk document format.
//!
//! A document is a JSON envelope:
//!
//! ```json
//! {"version": 1, "id": "...", "fileName": "Untitled", "layers": [...], "interactions": [...]}
//! ```
//!
//! Older files are a bare JSON array of layers; those still open.

use crate::interaction::Interaction;
use crate::layers::Layer;
use crate::storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Envelope version written by this crate.
pub const DOCUMENT_VERSION: u32 = 1;

/// Extension used for "save as" downloads.
pub const FILE_EXTENSION: &str = ".figma";

pub const DEFAULT_FILE_NAME: &str = "Untitled";

/// Errors from reading, writing or persisting a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Expected a document object or a layer array, got {0}")]
    UnexpectedShape(&'static str),
    #[error("Unsupported document version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

/// Serialized form of an editor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub version: u32,
    #[serde(default = "new_document_id")]
    pub id: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

impl Default for DocumentFile {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl DocumentFile {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            id: new_document_id(),
            file_name: file_name.into(),
            layers: Vec::new(),
            interactions: Vec::new(),
        }
    }

    /// Parse an envelope or a legacy bare layer array.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value {
            serde_json::Value::Array(_) => {
                let layers: Vec<Layer> = serde_json::from_value(value)?;
                log::debug!("Read legacy layer array ({} layers)", layers.len());
                Ok(Self {
                    layers,
                    ..Self::default()
                })
            }
            serde_json::Value::Object(_) => {
                let doc: DocumentFile = serde_json::from_value(value)?;
                if doc.version > DOCUMENT_VERSION {
                    return Err(DocumentError::UnsupportedVersion {
                        found: doc.version,
                        supported: DOCUMENT_VERSION,
                    });
                }
                Ok(doc)
            }
            serde_json::Value::Null => Err(DocumentError::UnexpectedShape("null")),
            serde_json::Value::Bool(_) => Err(DocumentError::UnexpectedShape("a boolean")),
            serde_json::Value::Number(_) => Err(DocumentError::UnexpectedShape("a number")),
            serde_json::Value::String(_) => Err(DocumentError::UnexpectedShape("a string")),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name for a download, with the `.figma` extension.
    pub fn download_name(&self) -> String {
        download_name(&self.file_name)
    }
}

/// Append [`FILE_EXTENSION`] unless `name` already carries it.
pub fn download_name(name: &str) -> String {
    let name = if name.trim().is_empty() { DEFAULT_FILE_NAME } else { name };
    if name.ends_with(FILE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{FILE_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::LayerId;
    use crate::interaction::InteractionDraft;

    #[test]
    fn test_envelope_roundtrip() {
        let mut doc = DocumentFile::new("Landing page");
        let frame = Layer::frame(0.0, 0.0, 390.0, 844.0);
        let button = Layer::rectangle(10.0, 10.0, 80.0, 30.0);
        doc.interactions.push(Interaction::new(
            button.id.clone(),
            InteractionDraft::navigate_to(frame.id.clone()),
        ));
        doc.layers = vec![frame, button];

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"fileName\": \"Landing page\""));
        let back = DocumentFile::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_legacy_array() {
        let json = r##"[{"id":"rectangle-1","type":"rectangle","x":0,"y":0,"width":10,"height":10,"fill":"#d9d9d9"}]"##;
        let doc = DocumentFile::from_json(json).unwrap();
        assert_eq!(doc.layers.len(), 1);
        assert_eq!(doc.layers[0].id, LayerId::new("rectangle-1"));
        assert_eq!(doc.file_name, DEFAULT_FILE_NAME);
        assert!(doc.interactions.is_empty());
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            DocumentFile::from_json("{not json"),
            Err(DocumentError::Parse(_))
        ));
        assert!(matches!(
            DocumentFile::from_json("42"),
            Err(DocumentError::UnexpectedShape(_))
        ));
        assert!(matches!(
            DocumentFile::from_json(r#"{"version": 99}"#),
            Err(DocumentError::UnsupportedVersion { found: 99, .. })
        ));
        assert!(matches!(
            DocumentFile::from_json(r#"[{"id": "x", "type": "blob"}]"#),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("Poster"), "Poster.figma");
        assert_eq!(download_name("Poster.figma"), "Poster.figma");
        assert_eq!(download_name("  "), "Untitled.figma");
    }
}
