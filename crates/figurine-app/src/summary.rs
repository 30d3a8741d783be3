//! Human-readable document summary.

use figurine_core::DocumentStore;
use figurine_core::layers::LayerType;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub file_name: String,
    pub document_id: String,
    pub layers: usize,
    pub root_layers: usize,
    pub by_type: BTreeMap<&'static str, usize>,
    pub interactions: usize,
    pub zoom_percent: u32,
    pub can_undo: bool,
}

impl DocumentSummary {
    pub fn of(store: &DocumentStore) -> Self {
        let mut by_type = BTreeMap::new();
        for layer in store.layers() {
            *by_type.entry(layer.layer_type().as_str()).or_insert(0) += 1;
        }
        Self {
            file_name: store.file_name().to_string(),
            document_id: store.document_id().to_string(),
            layers: store.layers().len(),
            root_layers: store.root_layers().len(),
            by_type,
            interactions: store.interactions().len(),
            zoom_percent: store.canvas().zoom_percent(),
            can_undo: store.can_undo(),
        }
    }

    pub fn count(&self, layer_type: LayerType) -> usize {
        self.by_type.get(layer_type.as_str()).copied().unwrap_or(0)
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.file_name, self.document_id)?;
        writeln!(f, "  layers: {} ({} at top level)", self.layers, self.root_layers)?;
        for (kind, count) in &self.by_type {
            writeln!(f, "    {:10} {}", kind, count)?;
        }
        writeln!(f, "  interactions: {}", self.interactions)?;
        write!(f, "  zoom: {}%", self.zoom_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figurine_core::Layer;

    #[test]
    fn test_summary_counts() {
        let mut store = DocumentStore::new();
        store.set_file_name("Poster");
        let a = store.add_layer(Layer::rectangle(0.0, 0.0, 10.0, 10.0));
        let b = store.add_layer(Layer::ellipse(20.0, 0.0, 10.0, 10.0));
        store.group_layers(&[a, b]);

        let summary = DocumentSummary::of(&store);
        assert_eq!(summary.layers, 3);
        assert_eq!(summary.root_layers, 1);
        assert_eq!(summary.count(LayerType::Group), 1);
        assert_eq!(summary.count(LayerType::Text), 0);
        assert!(summary.can_undo);

        let text = summary.to_string();
        assert!(text.starts_with("Poster ("));
        assert!(text.contains("    rectangle  1"));
        assert!(text.ends_with("zoom: 100%"));
    }
}
