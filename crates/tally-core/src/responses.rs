//! CLI response types returned as JSON by `tally` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CheckItemDocument, Document};
use crate::enums::{CheckStatus, ItemType, LinkState};
use crate::transition::CheckItemTransition;

/// Result of reconciling a checklist definition against the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub deleted: u32,
}

impl SyncReport {
    #[must_use]
    pub const fn total_seen(&self) -> u32 {
        self.inserted + self.updated + self.unchanged
    }
}

/// One row of `tally status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChecklistOverviewRow {
    pub path: String,
    pub item_type: ItemType,
    pub status: CheckStatus,
    pub linked: u32,
    pub checked: u32,
    pub captured: u32,
}

/// Response from `tally link ...` and `tally capture attach`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LinkChangeResponse {
    pub item_path: String,
    pub document_path: String,
    pub transition: CheckItemTransition,
    pub state: LinkState,
    pub committed: bool,
    pub link: Option<CheckItemDocument>,
}

/// Response from `tally doc scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScanReport {
    pub registered: Vec<Document>,
    pub already_known: u32,
    /// Registered documents whose file no longer exists.
    pub missing: Vec<String>,
}
