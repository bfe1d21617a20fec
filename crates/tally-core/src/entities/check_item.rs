use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CheckStatus, ItemType};

/// A node in the checklist tree, identified by its slash-separated path.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckItem {
    pub id: String,
    pub parent_id: Option<String>,
    pub label: String,
    /// Ancestor labels plus own label, joined by `/`. Unique.
    pub path: String,
    pub item_type: ItemType,
    pub status: CheckStatus,
    /// Position among siblings, as ordered in the checklist definition.
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CheckItem {
    /// Number of ancestors (0 for a root node).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }

    /// Path of the parent node, derived from this node's path.
    #[must_use]
    pub fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('/').map(|(parent, _)| parent)
    }
}
