//! Entity structs for all Tally domain objects.
//!
//! Each entity maps to a table in the workspace database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and schema
//! validation.

mod check_item;
mod check_item_document;
mod document;

pub use check_item::CheckItem;
pub use check_item_document::CheckItemDocument;
pub use document::Document;
