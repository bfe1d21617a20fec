use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::LinkState;

/// Link between one check item and one document, with optional capture evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CheckItemDocument {
    pub id: String,
    pub check_item_id: String,
    pub document_id: String,
    pub checked: bool,
    pub linked_at: DateTime<Utc>,
    /// Capture file name, relative to the captures folder.
    pub capture_file: Option<String>,
}

impl CheckItemDocument {
    #[must_use]
    pub fn state(&self) -> LinkState {
        LinkState::of(Some(self))
    }
}
