//! Repository modules implementing the workspace operations.
//!
//! Each module adds methods to `TallyService` via `impl TallyService` blocks.

pub mod check_item;
pub mod checklist_sync;
pub mod document;
pub mod link;
pub mod overview;
pub mod transition;
