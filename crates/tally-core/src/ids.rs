//! ID prefix constants.
//!
//! IDs are generated by the database as `{prefix}-{8 hex chars}`.

pub const PREFIX_DOCUMENT: &str = "doc";
pub const PREFIX_CHECK_ITEM: &str = "itm";
pub const PREFIX_LINK: &str = "lnk";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_DOCUMENT, PREFIX_CHECK_ITEM, PREFIX_LINK];
