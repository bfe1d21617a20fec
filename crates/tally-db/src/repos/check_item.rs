//! Check item repository: the stored checklist tree.

use chrono::Utc;

use tally_core::checklist::build_path;
use tally_core::entities::CheckItem;
use tally_core::enums::{CheckStatus, ItemType};
use tally_core::ids::PREFIX_CHECK_ITEM;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::TallyService;

pub(crate) const SELECT_COLS: &str =
    "id, parent_id, label, path, item_type, status, sort_order, created_at, updated_at";

pub(crate) fn row_to_check_item(row: &libsql::Row) -> Result<CheckItem, DatabaseError> {
    Ok(CheckItem {
        id: row.get::<String>(0)?,
        parent_id: get_opt_string(row, 1)?,
        label: row.get::<String>(2)?,
        path: row.get::<String>(3)?,
        item_type: parse_enum(&row.get::<String>(4)?)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        sort_order: row.get::<i64>(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl TallyService {
    /// Append a check item under `parent_id` (or at the root).
    ///
    /// The path is derived from the parent's path and the label; the new
    /// item goes after its existing siblings.
    pub async fn create_check_item(
        &self,
        parent_id: Option<&str>,
        label: &str,
        item_type: ItemType,
    ) -> Result<CheckItem, DatabaseError> {
        let parent = match parent_id {
            Some(id) => Some(self.get_check_item(id).await?),
            None => None,
        };
        let path = build_path(parent.as_ref().map(|p| p.path.as_str()), label)?;
        let label = label.trim();

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM check_items WHERE parent_id IS ?1",
                libsql::params![parent_id],
            )
            .await?;
        let sort_order = match rows.next().await? {
            Some(row) => row.get::<i64>(0)?,
            None => 0,
        };

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CHECK_ITEM).await?;
        let status = CheckStatus::default();

        self.db()
            .conn()
            .execute(
                "INSERT INTO check_items (id, parent_id, label, path, item_type, status, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    parent_id,
                    label,
                    path.as_str(),
                    item_type.as_str(),
                    status.as_str(),
                    sort_order,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(%id, %path, "created check item");
        Ok(CheckItem {
            id,
            parent_id: parent_id.map(String::from),
            label: label.to_string(),
            path,
            item_type,
            status,
            sort_order,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_check_item(&self, id: &str) -> Result<CheckItem, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM check_items WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_check_item(&row)
    }

    pub async fn get_check_item_by_path(&self, path: &str) -> Result<CheckItem, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM check_items WHERE path = ?1"),
                [path.trim()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_check_item(&row)
    }

    /// Every check item, ordered by path so parents precede children.
    pub async fn list_check_items(&self) -> Result<Vec<CheckItem>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM check_items ORDER BY path"),
                (),
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_check_item(&row)?);
        }
        Ok(items)
    }

    /// Direct children of `parent_id` (roots for `None`) in sibling order.
    pub async fn children_of(&self, parent_id: Option<&str>) -> Result<Vec<CheckItem>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM check_items WHERE parent_id IS ?1 ORDER BY sort_order, path"
                ),
                libsql::params![parent_id],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_check_item(&row)?);
        }
        Ok(items)
    }

    pub async fn set_check_status(
        &self,
        id: &str,
        status: CheckStatus,
    ) -> Result<CheckItem, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE check_items SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), Utc::now().to_rfc3339(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(%id, %status, "set check status");
        self.get_check_item(id).await
    }

    /// Move the item to the next status in the pending, done, n/a cycle.
    pub async fn advance_check_status(&self, id: &str) -> Result<CheckItem, DatabaseError> {
        let item = self.get_check_item(id).await?;
        self.set_check_status(id, item.status.advance()).await
    }

    /// Delete a check item with its subtree and their links.
    pub async fn delete_check_item(&self, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute("DELETE FROM check_items WHERE id = ?1", [id])
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(%id, "deleted check item");
        Ok(())
    }
}
