//! Reconciliation of a checklist definition against the stored tree.
//!
//! The definition is walked level by level so every parent row exists
//! (and its ID is known) before its children are written. Each level costs
//! one batched `SELECT ... WHERE path IN (...)` instead of a lookup per node.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use tally_core::checklist::{ChecklistDefinition, FlatNode};
use tally_core::entities::CheckItem;
use tally_core::enums::CheckStatus;
use tally_core::ids::PREFIX_CHECK_ITEM;
use tally_core::responses::SyncReport;

use crate::error::DatabaseError;
use crate::helpers::placeholders;
use crate::repos::check_item::{SELECT_COLS, row_to_check_item};
use crate::service::TallyService;

/// Upper bound on bound parameters per `IN (...)` query.
const PATH_BATCH: usize = 500;

async fn fetch_by_paths(
    conn: &libsql::Connection,
    paths: &[&str],
) -> Result<HashMap<String, CheckItem>, DatabaseError> {
    let mut found = HashMap::with_capacity(paths.len());
    for chunk in paths.chunks(PATH_BATCH) {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM check_items WHERE path IN ({})",
            placeholders(chunk.len())
        );
        let params: Vec<libsql::Value> = chunk.iter().map(|p| (*p).into()).collect();
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        while let Some(row) = rows.next().await? {
            let item = row_to_check_item(&row)?;
            found.insert(item.path.clone(), item);
        }
    }
    Ok(found)
}

fn needs_refresh(stored: &CheckItem, node: &FlatNode, parent_id: Option<&str>) -> bool {
    stored.label != node.label
        || stored.item_type != node.item_type
        || stored.sort_order != node.sort_order
        || stored.parent_id.as_deref() != parent_id
}

impl TallyService {
    /// Bring the stored checklist in line with `definition`.
    ///
    /// New paths are inserted with a status derived from `checked`. Known
    /// paths keep their ID and status; label, type, parent and sort order
    /// are refreshed. Stored paths missing from the definition are deleted
    /// together with their links. Everything happens in one transaction.
    pub async fn sync_checklist(
        &self,
        definition: &ChecklistDefinition,
    ) -> Result<SyncReport, DatabaseError> {
        let levels = definition.levels()?;
        let wanted = definition.paths()?;

        let tx = self.db().conn().transaction().await?;
        let now = Utc::now().to_rfc3339();
        let mut report = SyncReport::default();
        let mut ids_by_path: HashMap<String, String> = HashMap::new();

        for (depth, level) in levels.iter().enumerate() {
            let paths: Vec<&str> = level.iter().map(|n| n.path.as_str()).collect();
            let existing = fetch_by_paths(&tx, &paths).await?;
            tracing::debug!(depth, nodes = level.len(), existing = existing.len(), "sync level");

            for node in level {
                let parent_id = match node.parent_path.as_deref() {
                    Some(parent) => Some(ids_by_path.get(parent).cloned().ok_or_else(|| {
                        DatabaseError::InvalidState(format!("parent of '{}' was not synced", node.path))
                    })?),
                    None => None,
                };

                let id = match existing.get(&node.path) {
                    Some(stored) if needs_refresh(stored, node, parent_id.as_deref()) => {
                        tx.execute(
                            "UPDATE check_items SET label = ?1, item_type = ?2, parent_id = ?3, sort_order = ?4, updated_at = ?5
                             WHERE id = ?6",
                            libsql::params![
                                node.label.as_str(),
                                node.item_type.as_str(),
                                parent_id.as_deref(),
                                node.sort_order,
                                now.as_str(),
                                stored.id.as_str()
                            ],
                        )
                        .await?;
                        report.updated += 1;
                        stored.id.clone()
                    }
                    Some(stored) => {
                        report.unchanged += 1;
                        stored.id.clone()
                    }
                    None => {
                        let id = self.db().generate_id(PREFIX_CHECK_ITEM).await?;
                        tx.execute(
                            "INSERT INTO check_items (id, parent_id, label, path, item_type, status, sort_order, created_at, updated_at)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                            libsql::params![
                                id.as_str(),
                                parent_id.as_deref(),
                                node.label.as_str(),
                                node.path.as_str(),
                                node.item_type.as_str(),
                                CheckStatus::from_checked(node.checked).as_str(),
                                node.sort_order,
                                now.as_str(),
                                now.as_str()
                            ],
                        )
                        .await?;
                        report.inserted += 1;
                        id
                    }
                };
                ids_by_path.insert(node.path.clone(), id);
            }
        }

        let mut stale = Vec::new();
        let mut rows = tx.query("SELECT id, path FROM check_items", ()).await?;
        while let Some(row) = rows.next().await? {
            let path = row.get::<String>(1)?;
            if !wanted.contains(&path) {
                stale.push((row.get::<String>(0)?, path));
            }
        }
        drop(rows);

        let stale_paths: HashSet<&str> = stale.iter().map(|(_, p)| p.as_str()).collect();
        for (id, path) in &stale {
            // Descendants go with their ancestor through the cascade.
            let covered = path
                .rsplit_once('/')
                .is_some_and(|(parent, _)| ancestor_listed(parent, &stale_paths));
            if !covered {
                tx.execute("DELETE FROM check_items WHERE id = ?1", [id.as_str()])
                    .await?;
            }
            tracing::debug!(%path, "removed check item absent from definition");
        }
        report.deleted = u32::try_from(stale.len())
            .map_err(|_| DatabaseError::InvalidState("too many stale check items".into()))?;

        tx.commit().await?;
        tracing::info!(
            inserted = report.inserted,
            updated = report.updated,
            unchanged = report.unchanged,
            deleted = report.deleted,
            "checklist synced"
        );
        Ok(report)
    }

    /// The stored tree as a definition, ready for `ChecklistSaver`.
    pub async fn export_checklist(&self) -> Result<ChecklistDefinition, DatabaseError> {
        let items = self.list_check_items().await?;
        Ok(ChecklistDefinition::from_items(&items))
    }
}

fn ancestor_listed(mut path: &str, listed: &HashSet<&str>) -> bool {
    loop {
        if listed.contains(path) {
            return true;
        }
        match path.rsplit_once('/') {
            Some((parent, _)) => path = parent,
            None => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tally_core::checklist::{ChecklistDefinition, ChecklistNode};
    use tally_core::enums::{CheckStatus, ItemType};
    use tally_core::responses::SyncReport;

    use crate::test_support::{seed_document, test_service};

    fn definition() -> ChecklistDefinition {
        ChecklistDefinition {
            check_items: vec![
                ChecklistNode::category(
                    "Structure",
                    vec![
                        ChecklistNode::item("Footings", true),
                        ChecklistNode::item("Columns", false),
                    ],
                ),
                ChecklistNode::category(
                    "Electrical",
                    vec![ChecklistNode::category(
                        "Panels",
                        vec![ChecklistNode::item("Main panel", false)],
                    )],
                ),
            ],
        }
    }

    #[tokio::test]
    async fn first_sync_inserts_everything() {
        let svc = test_service().await;
        let report = svc.sync_checklist(&definition()).await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                inserted: 6,
                updated: 0,
                unchanged: 0,
                deleted: 0
            }
        );

        let footings = svc.get_check_item_by_path("Structure/Footings").await.unwrap();
        assert_eq!(footings.status, CheckStatus::Done);
        assert_eq!(footings.sort_order, 0);

        let panel = svc
            .get_check_item_by_path("Electrical/Panels/Main panel")
            .await
            .unwrap();
        let panels = svc.get_check_item_by_path("Electrical/Panels").await.unwrap();
        assert_eq!(panel.parent_id.as_deref(), Some(panels.id.as_str()));
        assert_eq!(panels.item_type, ItemType::Category);
    }

    #[tokio::test]
    async fn resync_is_unchanged_and_keeps_ids() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();
        let before = svc.get_check_item_by_path("Structure/Columns").await.unwrap();

        let report = svc.sync_checklist(&definition()).await.unwrap();
        assert_eq!(report.unchanged, 6);
        assert_eq!(report.total_seen(), 6);

        let after = svc.get_check_item_by_path("Structure/Columns").await.unwrap();
        assert_eq!(after.id, before.id);
    }

    #[tokio::test]
    async fn existing_status_survives_resync() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();
        let columns = svc.get_check_item_by_path("Structure/Columns").await.unwrap();
        svc.set_check_status(&columns.id, CheckStatus::NotApplicable)
            .await
            .unwrap();

        svc.sync_checklist(&definition()).await.unwrap();
        let columns = svc.get_check_item_by_path("Structure/Columns").await.unwrap();
        assert_eq!(columns.status, CheckStatus::NotApplicable);
    }

    #[tokio::test]
    async fn reorder_and_retype_are_updates() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();

        let mut changed = definition();
        changed.check_items[0].children.reverse();
        changed.check_items[0].children[0].item_type = ItemType::Category;

        let report = svc.sync_checklist(&changed).await.unwrap();
        assert_eq!(report.updated, 2);
        assert_eq!(report.unchanged, 4);

        let columns = svc.get_check_item_by_path("Structure/Columns").await.unwrap();
        assert_eq!(columns.sort_order, 0);
        assert_eq!(columns.item_type, ItemType::Category);
    }

    #[tokio::test]
    async fn removed_nodes_are_deleted_with_links() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();
        let panel = svc
            .get_check_item_by_path("Electrical/Panels/Main panel")
            .await
            .unwrap();
        let doc_id = seed_document(&svc, "panel-schedule.pdf").await;
        svc.link_document(&panel.id, &doc_id, true).await.unwrap();

        let mut trimmed = definition();
        trimmed.check_items.truncate(1);
        let report = svc.sync_checklist(&trimmed).await.unwrap();
        assert_eq!(report.deleted, 3);
        assert_eq!(report.unchanged, 3);

        assert_eq!(svc.list_check_items().await.unwrap().len(), 3);
        assert!(svc.links_for_document(&doc_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn renamed_label_is_a_new_path() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();

        let mut renamed = definition();
        renamed.check_items[0].children[1].label = "Beams".into();
        let report = svc.sync_checklist(&renamed).await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.deleted, 1);
        assert!(svc.get_check_item_by_path("Structure/Columns").await.is_err());
    }

    #[tokio::test]
    async fn invalid_definition_leaves_store_untouched() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();

        let broken = ChecklistDefinition {
            check_items: vec![
                ChecklistNode::item("Dup", false),
                ChecklistNode::item("Dup", false),
            ],
        };
        assert!(svc.sync_checklist(&broken).await.is_err());
        assert_eq!(svc.list_check_items().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn export_round_trips_the_tree() {
        let svc = test_service().await;
        svc.sync_checklist(&definition()).await.unwrap();

        let exported = svc.export_checklist().await.unwrap();
        assert_eq!(exported.paths().unwrap(), definition().paths().unwrap());
        assert_eq!(exported.check_items[0].label, "Structure");
        assert!(exported.check_items[0].children[0].checked);
    }
}
