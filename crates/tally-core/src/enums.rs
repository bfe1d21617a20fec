//! Item types, check status and link states for Tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage, except `LinkState` which is stored
//! and displayed by its two-character code.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::CheckItemDocument;
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ItemType
// ---------------------------------------------------------------------------

/// Kind of checklist node. Categories group items; items carry evidence.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Category,
    #[default]
    Item,
}

impl ItemType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

/// Review status of a check item.
///
/// ```text
/// pending → done → not_applicable → pending
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    #[default]
    Pending,
    Done,
    NotApplicable,
}

impl CheckStatus {
    /// Next status in the toggle cycle.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::NotApplicable,
            Self::NotApplicable => Self::Pending,
        }
    }

    /// Status implied by the `checked` flag of a checklist definition node.
    #[must_use]
    pub const fn from_checked(checked: bool) -> Self {
        if checked { Self::Done } else { Self::Pending }
    }

    #[must_use]
    pub const fn is_checked(self) -> bool {
        matches!(self, Self::Done)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LinkState
// ---------------------------------------------------------------------------

/// State of one (check item, document) pair.
///
/// The first digit encodes the link (`0` none, `1` checked, `2` unchecked),
/// the second the capture (`0` none, otherwise mirrors the first digit).
///
/// ```text
/// 00 ──check──▶ 10 | 11        (capture prompt decides)
/// 10 ──uncheck─▶ 20            11 ──uncheck─▶ 22
/// 20 ──check──▶ 10 | 11        22 ──check───▶ 11
/// any linked ──unlink──▶ 00
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum LinkState {
    #[serde(rename = "00")]
    Unlinked,
    #[serde(rename = "10")]
    CheckedNoCapture,
    #[serde(rename = "11")]
    CheckedWithCapture,
    #[serde(rename = "20")]
    UncheckedNoCapture,
    #[serde(rename = "22")]
    UncheckedWithCapture,
}

impl LinkState {
    /// Derive the state from the stored link row, if any.
    #[must_use]
    pub fn of(link: Option<&CheckItemDocument>) -> Self {
        match link {
            None => Self::Unlinked,
            Some(link) => Self::from_parts(true, link.checked, link.capture_file.is_some()),
        }
    }

    /// Compose a state from its three underlying facts.
    #[must_use]
    pub const fn from_parts(linked: bool, checked: bool, has_capture: bool) -> Self {
        match (linked, checked, has_capture) {
            (false, _, _) => Self::Unlinked,
            (true, true, false) => Self::CheckedNoCapture,
            (true, true, true) => Self::CheckedWithCapture,
            (true, false, false) => Self::UncheckedNoCapture,
            (true, false, true) => Self::UncheckedWithCapture,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unlinked => "00",
            Self::CheckedNoCapture => "10",
            Self::CheckedWithCapture => "11",
            Self::UncheckedNoCapture => "20",
            Self::UncheckedWithCapture => "22",
        }
    }

    /// Parse a two-character state code.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for anything other than the five codes.
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        match code {
            "00" => Ok(Self::Unlinked),
            "10" => Ok(Self::CheckedNoCapture),
            "11" => Ok(Self::CheckedWithCapture),
            "20" => Ok(Self::UncheckedNoCapture),
            "22" => Ok(Self::UncheckedWithCapture),
            other => Err(CoreError::Validation(format!(
                "unknown link state code '{other}'"
            ))),
        }
    }

    #[must_use]
    pub const fn is_linked(self) -> bool {
        !matches!(self, Self::Unlinked)
    }

    #[must_use]
    pub const fn is_checked(self) -> bool {
        matches!(self, Self::CheckedNoCapture | Self::CheckedWithCapture)
    }

    #[must_use]
    pub const fn has_capture(self) -> bool {
        matches!(self, Self::CheckedWithCapture | Self::UncheckedWithCapture)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link(checked: bool, capture: Option<&str>) -> CheckItemDocument {
        CheckItemDocument {
            id: "lnk-00000001".into(),
            check_item_id: "itm-00000001".into(),
            document_id: "doc-00000001".into(),
            checked,
            linked_at: Utc::now(),
            capture_file: capture.map(String::from),
        }
    }

    #[test]
    fn advance_cycles_through_all_statuses() {
        let mut status = CheckStatus::Pending;
        let mut seen = vec![status];
        for _ in 0..3 {
            status = status.advance();
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                CheckStatus::Pending,
                CheckStatus::Done,
                CheckStatus::NotApplicable,
                CheckStatus::Pending
            ]
        );
    }

    #[test]
    fn checked_flag_maps_to_status() {
        assert_eq!(CheckStatus::from_checked(true), CheckStatus::Done);
        assert_eq!(CheckStatus::from_checked(false), CheckStatus::Pending);
        assert!(CheckStatus::Done.is_checked());
        assert!(!CheckStatus::NotApplicable.is_checked());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&CheckStatus::NotApplicable).unwrap();
        assert_eq!(json, "\"not_applicable\"");
        assert_eq!(CheckStatus::NotApplicable.as_str(), "not_applicable");
    }

    #[test]
    fn link_state_derived_from_row() {
        assert_eq!(LinkState::of(None), LinkState::Unlinked);
        assert_eq!(LinkState::of(Some(&link(true, None))), LinkState::CheckedNoCapture);
        assert_eq!(
            LinkState::of(Some(&link(true, Some("c.png")))),
            LinkState::CheckedWithCapture
        );
        assert_eq!(LinkState::of(Some(&link(false, None))), LinkState::UncheckedNoCapture);
        assert_eq!(
            LinkState::of(Some(&link(false, Some("c.png")))),
            LinkState::UncheckedWithCapture
        );
    }

    #[test]
    fn link_state_codes_parse_back() {
        for state in [
            LinkState::Unlinked,
            LinkState::CheckedNoCapture,
            LinkState::CheckedWithCapture,
            LinkState::UncheckedNoCapture,
            LinkState::UncheckedWithCapture,
        ] {
            assert_eq!(LinkState::from_code(state.code()).unwrap(), state);
        }
        assert!(LinkState::from_code("12").is_err());
        assert!(LinkState::from_code("").is_err());
    }

    #[test]
    fn link_state_serializes_as_code() {
        let json = serde_json::to_string(&LinkState::UncheckedWithCapture).unwrap();
        assert_eq!(json, "\"22\"");
    }
}
