//! JSON checklist definition, path generation, and load/save.
//!
//! A checklist file looks like:
//!
//! ```json
//! {
//!   "checkItems": [
//!     { "label": "Structural", "type": "category", "children": [
//!       { "label": "Foundations", "type": "item", "checked": false }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Every node is addressed by its path: the ancestor labels followed by its
//! own label, joined by `/` (`Structural/Foundations`).

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CheckItem;
use crate::enums::ItemType;
use crate::errors::CoreError;

pub const PATH_SEPARATOR: char = '/';

/// Root of a checklist definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDefinition {
    #[serde(default)]
    pub check_items: Vec<ChecklistNode>,
}

/// One category or item in the definition tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChecklistNode {
    pub label: String,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub children: Vec<ChecklistNode>,
}

impl ChecklistNode {
    #[must_use]
    pub fn category(label: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            item_type: ItemType::Category,
            checked: false,
            children,
        }
    }

    #[must_use]
    pub fn item(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            item_type: ItemType::Item,
            checked,
            children: Vec::new(),
        }
    }
}

/// A definition node flattened with its computed path, ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    pub path: String,
    pub parent_path: Option<String>,
    pub label: String,
    pub item_type: ItemType,
    pub checked: bool,
    pub sort_order: i64,
}

/// Compute the path of a node from its parent's path and its label.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the label is blank or contains `/`.
pub fn build_path(parent_path: Option<&str>, label: &str) -> Result<String, CoreError> {
    let label = validate_label(label)?;
    Ok(match parent_path {
        Some(parent) if !parent.is_empty() => format!("{parent}{PATH_SEPARATOR}{label}"),
        _ => label.to_string(),
    })
}

/// Trim a label and reject the ones that cannot be part of a path.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the label is blank or contains `/`.
pub fn validate_label(label: &str) -> Result<&str, CoreError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("check item label is empty".into()));
    }
    if trimmed.contains(PATH_SEPARATOR) {
        return Err(CoreError::Validation(format!(
            "check item label '{trimmed}' must not contain '{PATH_SEPARATOR}'"
        )));
    }
    Ok(trimmed)
}

impl ChecklistDefinition {
    /// Flatten the tree into breadth-first levels.
    ///
    /// Level 0 holds the root nodes; every node of level `n + 1` has its
    /// parent in level `n`. Sort order is the index among siblings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on an invalid label or when two nodes
    /// resolve to the same path.
    pub fn levels(&self) -> Result<Vec<Vec<FlatNode>>, CoreError> {
        let mut levels: Vec<Vec<FlatNode>> = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<(usize, Option<String>, &[ChecklistNode])> = VecDeque::new();
        queue.push_back((0, None, self.check_items.as_slice()));

        while let Some((depth, parent_path, nodes)) = queue.pop_front() {
            for (index, node) in nodes.iter().enumerate() {
                let path = build_path(parent_path.as_deref(), &node.label)?;
                if !seen.insert(path.clone()) {
                    return Err(CoreError::Validation(format!(
                        "duplicate check item path '{path}'"
                    )));
                }
                if levels.len() <= depth {
                    levels.push(Vec::new());
                }
                levels[depth].push(FlatNode {
                    path: path.clone(),
                    parent_path: parent_path.clone(),
                    label: node.label.trim().to_string(),
                    item_type: node.item_type,
                    checked: node.checked,
                    sort_order: i64::try_from(index).unwrap_or(i64::MAX),
                });
                if !node.children.is_empty() {
                    queue.push_back((depth + 1, Some(path), node.children.as_slice()));
                }
            }
        }

        Ok(levels)
    }

    /// Every path in the definition.
    ///
    /// # Errors
    ///
    /// Same as [`Self::levels`].
    pub fn paths(&self) -> Result<HashSet<String>, CoreError> {
        Ok(self
            .levels()?
            .into_iter()
            .flatten()
            .map(|node| node.path)
            .collect())
    }

    /// Total number of nodes, categories included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[ChecklistNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.check_items)
    }

    /// Rebuild a definition tree from stored check items.
    ///
    /// Siblings are ordered by `sort_order`, then label. `checked` mirrors
    /// whether the item status is `done`. Items whose parent is missing from
    /// `items` are treated as roots.
    #[must_use]
    pub fn from_items(items: &[CheckItem]) -> Self {
        let ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let mut by_parent: HashMap<Option<&str>, Vec<&CheckItem>> = HashMap::new();
        for item in items {
            let parent = item
                .parent_id
                .as_deref()
                .filter(|parent| ids.contains(parent));
            by_parent.entry(parent).or_default().push(item);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by(|a, b| {
                a.sort_order
                    .cmp(&b.sort_order)
                    .then_with(|| a.label.cmp(&b.label))
            });
        }

        fn build<'a>(
            parent: Option<&'a str>,
            by_parent: &HashMap<Option<&'a str>, Vec<&'a CheckItem>>,
        ) -> Vec<ChecklistNode> {
            by_parent
                .get(&parent)
                .map(|children| {
                    children
                        .iter()
                        .map(|&item| ChecklistNode {
                            label: item.label.clone(),
                            item_type: item.item_type,
                            checked: item.status.is_checked(),
                            children: build(Some(item.id.as_str()), by_parent),
                        })
                        .collect()
                })
                .unwrap_or_default()
        }

        Self {
            check_items: build(None, &by_parent),
        }
    }
}

/// Reads checklist definition files.
pub struct ChecklistLoader;

impl ChecklistLoader {
    /// Load and parse a checklist file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ChecklistIo` if the file cannot be read and
    /// `CoreError::ChecklistJson` if it is not a valid definition.
    pub fn load(path: &Path) -> Result<ChecklistDefinition, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::ChecklistIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Parse a checklist definition from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ChecklistJson` if the JSON does not match the format.
    pub fn parse(raw: &str) -> Result<ChecklistDefinition, CoreError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Writes checklist definition files.
pub struct ChecklistSaver;

impl ChecklistSaver {
    /// Serialize a definition as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ChecklistJson` if serialization fails.
    pub fn to_string(definition: &ChecklistDefinition) -> Result<String, CoreError> {
        let mut out = serde_json::to_string_pretty(definition)?;
        out.push('\n');
        Ok(out)
    }

    /// Write a definition to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ChecklistIo` if the file cannot be written.
    pub fn save(definition: &ChecklistDefinition, path: &Path) -> Result<(), CoreError> {
        let io_err = |source| CoreError::ChecklistIo {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, Self::to_string(definition)?).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::CheckStatus;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn sample() -> ChecklistDefinition {
        ChecklistDefinition {
            check_items: vec![
                ChecklistNode::category(
                    "Structural",
                    vec![
                        ChecklistNode::item("Foundations", true),
                        ChecklistNode::category(
                            "Steel",
                            vec![ChecklistNode::item("Connections", false)],
                        ),
                    ],
                ),
                ChecklistNode::item("Permits", false),
            ],
        }
    }

    #[test]
    fn build_path_joins_ancestors() {
        assert_eq!(build_path(None, "Structural").unwrap(), "Structural");
        assert_eq!(
            build_path(Some("Structural/Steel"), " Connections ").unwrap(),
            "Structural/Steel/Connections"
        );
    }

    #[test]
    fn build_path_rejects_bad_labels() {
        assert!(build_path(None, "   ").is_err());
        assert!(build_path(Some("A"), "B/C").is_err());
    }

    #[test]
    fn levels_are_breadth_first_with_paths() {
        let levels = sample().levels().unwrap();
        assert_eq!(levels.len(), 3);

        let level0: Vec<&str> = levels[0].iter().map(|n| n.path.as_str()).collect();
        assert_eq!(level0, vec!["Structural", "Permits"]);

        let level1: Vec<&str> = levels[1].iter().map(|n| n.path.as_str()).collect();
        assert_eq!(level1, vec!["Structural/Foundations", "Structural/Steel"]);
        assert_eq!(levels[1][1].parent_path.as_deref(), Some("Structural"));
        assert_eq!(levels[1][1].sort_order, 1);

        assert_eq!(levels[2][0].path, "Structural/Steel/Connections");
        assert_eq!(levels[2][0].item_type, ItemType::Item);
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let def = ChecklistDefinition {
            check_items: vec![ChecklistNode::item("A", false), ChecklistNode::item(" A", true)],
        };
        let err = def.levels().unwrap_err();
        assert!(err.to_string().contains("duplicate check item path 'A'"));
    }

    #[test]
    fn parse_applies_defaults() {
        let def = ChecklistLoader::parse(
            r#"{ "checkItems": [ { "label": "Only" }, { "label": "Cat", "type": "category", "children": [] } ] }"#,
        )
        .unwrap();
        assert_eq!(def.check_items[0].item_type, ItemType::Item);
        assert!(!def.check_items[0].checked);
        assert_eq!(def.check_items[1].item_type, ItemType::Category);
        assert_eq!(def.node_count(), 2);
    }

    #[test]
    fn parse_rejects_unknown_type() {
        let result = ChecklistLoader::parse(r#"{ "checkItems": [ { "label": "X", "type": "folder" } ] }"#);
        assert!(matches!(result, Err(CoreError::ChecklistJson(_))));
    }

    #[test]
    fn save_then_load_preserves_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config").join("checklist.json");
        ChecklistSaver::save(&sample(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"checkItems\""));
        assert!(raw.contains("\"type\": \"category\""));

        let loaded = ChecklistLoader::load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = ChecklistLoader::load(Path::new("/nonexistent/checklist.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/checklist.json"));
    }

    #[test]
    fn from_items_rebuilds_tree() {
        let now = Utc::now();
        let row = |id: &str, parent: Option<&str>, label: &str, path: &str, order: i64, status| CheckItem {
            id: id.into(),
            parent_id: parent.map(String::from),
            label: label.into(),
            path: path.into(),
            item_type: if parent.is_none() { ItemType::Category } else { ItemType::Item },
            status,
            sort_order: order,
            created_at: now,
            updated_at: now,
        };
        let items = vec![
            row("itm-2", Some("itm-1"), "Beta", "Root/Beta", 1, CheckStatus::Pending),
            row("itm-1", None, "Root", "Root", 0, CheckStatus::Pending),
            row("itm-3", Some("itm-1"), "Alpha", "Root/Alpha", 0, CheckStatus::Done),
        ];

        let def = ChecklistDefinition::from_items(&items);
        assert_eq!(
            def,
            ChecklistDefinition {
                check_items: vec![ChecklistNode::category(
                    "Root",
                    vec![
                        ChecklistNode::item("Alpha", true),
                        ChecklistNode::item("Beta", false),
                    ],
                )],
            }
        );
    }
}
