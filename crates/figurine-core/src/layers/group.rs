//! Group layer properties.

use crate::ids::LayerId;
use serde::{Deserialize, Serialize};

/// Fields carried only by group layers.
///
/// Children are referenced by id; the child layers themselves stay in the
/// flat layer list and store their position relative to the group origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProps {
    #[serde(default)]
    pub children: Vec<LayerId>,
    /// Whether the group is expanded in the layer list.
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

fn default_expanded() -> bool {
    true
}

impl GroupProps {
    pub fn new(children: Vec<LayerId>) -> Self {
        Self {
            children,
            expanded: true,
        }
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.children.contains(id)
    }
}
