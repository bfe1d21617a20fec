//! Per-item link counts for status reporting.

use tally_core::responses::ChecklistOverviewRow;

use crate::error::DatabaseError;
use crate::helpers::{get_count, parse_enum};
use crate::service::TallyService;

impl TallyService {
    /// One row per check item, ordered by path, with the number of linked,
    /// checked, and captured documents.
    pub async fn checklist_overview(&self) -> Result<Vec<ChecklistOverviewRow>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT ci.path, ci.item_type, ci.status,
                        COUNT(l.id),
                        COALESCE(SUM(l.checked), 0),
                        COUNT(NULLIF(l.capture_file, ''))
                 FROM check_items ci
                 LEFT JOIN check_item_documents l ON l.check_item_id = ci.id
                 GROUP BY ci.id
                 ORDER BY ci.path",
                (),
            )
            .await?;

        let mut overview = Vec::new();
        while let Some(row) = rows.next().await? {
            overview.push(ChecklistOverviewRow {
                path: row.get::<String>(0)?,
                item_type: parse_enum(&row.get::<String>(1)?)?,
                status: parse_enum(&row.get::<String>(2)?)?,
                linked: get_count(&row, 3)?,
                checked: get_count(&row, 4)?,
                captured: get_count(&row, 5)?,
            });
        }
        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tally_core::enums::{CheckStatus, ItemType, LinkState};
    use tally_core::responses::ChecklistOverviewRow;

    use crate::test_support::{seed_document, seed_item, test_service};

    #[tokio::test]
    async fn empty_store_has_no_rows() {
        let svc = test_service().await;
        assert!(svc.checklist_overview().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn counts_links_per_item() {
        let svc = test_service().await;
        let (_, item_id) = seed_item(&svc).await;
        let a = seed_document(&svc, "a.pdf").await;
        let b = seed_document(&svc, "b.pdf").await;
        let c = seed_document(&svc, "c.pdf").await;

        let link = svc.link_document(&item_id, &a, true).await.unwrap();
        svc.set_link_capture(&link.id, Some("cap.png")).await.unwrap();
        let link = svc.link_document(&item_id, &b, true).await.unwrap();
        // A blank capture reads back as no capture, so it must not count.
        let link = svc.set_link_capture(&link.id, Some("")).await.unwrap();
        assert_eq!(link.state(), LinkState::CheckedNoCapture);
        svc.link_document(&item_id, &c, false).await.unwrap();

        let overview = svc.checklist_overview().await.unwrap();
        assert_eq!(
            overview,
            vec![
                ChecklistOverviewRow {
                    path: "Structure".into(),
                    item_type: ItemType::Category,
                    status: CheckStatus::Pending,
                    linked: 0,
                    checked: 0,
                    captured: 0,
                },
                ChecklistOverviewRow {
                    path: "Structure/Footings".into(),
                    item_type: ItemType::Item,
                    status: CheckStatus::Pending,
                    linked: 3,
                    checked: 2,
                    captured: 1,
                },
            ]
        );
    }
}
