use serde::Serialize;
use tally_core::entities::CheckItem;
use tally_core::enums::{CheckStatus, ItemType};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct TreeRow {
    tree: String,
    item_type: ItemType,
    status: CheckStatus,
    id: String,
}

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let items = ctx.service.list_check_items().await?;
    output(&tree_rows(&items), flags.format)
}

/// Depth-first rows in sibling order, labels indented by depth.
fn tree_rows(items: &[CheckItem]) -> Vec<TreeRow> {
    fn walk(parent: Option<&str>, items: &[CheckItem], depth: usize, rows: &mut Vec<TreeRow>) {
        let mut children: Vec<&CheckItem> = items
            .iter()
            .filter(|item| item.parent_id.as_deref() == parent)
            .collect();
        children.sort_by_key(|item| item.sort_order);
        for item in children {
            rows.push(TreeRow {
                tree: format!("{}{}", "  ".repeat(depth), item.label),
                item_type: item.item_type,
                status: item.status,
                id: item.id.clone(),
            });
            walk(Some(&item.id), items, depth + 1, rows);
        }
    }

    let mut rows = Vec::with_capacity(items.len());
    walk(None, items, 0, &mut rows);
    rows
}
