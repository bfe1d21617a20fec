//! Check item / document link repository.
//!
//! A row in `check_item_documents` is the stored half of a [`LinkState`]:
//! no row is `00`, otherwise `checked` and `capture_file` pick the code.
//! These methods write rows directly; state-machine driven changes go
//! through [`TallyService::commit_transition`].

use std::collections::HashSet;

use chrono::Utc;

use tally_core::entities::CheckItemDocument;
use tally_core::enums::LinkState;
use tally_core::ids::PREFIX_LINK;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::TallyService;

const SELECT_COLS: &str = "id, check_item_id, document_id, checked, linked_at, capture_file";

fn row_to_link(row: &libsql::Row) -> Result<CheckItemDocument, DatabaseError> {
    Ok(CheckItemDocument {
        id: row.get::<String>(0)?,
        check_item_id: row.get::<String>(1)?,
        document_id: row.get::<String>(2)?,
        checked: row.get::<i64>(3)? != 0,
        linked_at: parse_datetime(&row.get::<String>(4)?)?,
        capture_file: get_opt_string(row, 5)?,
    })
}

/// Read the link for a pair on `conn` (which may be an open transaction).
pub(crate) async fn fetch_link(
    conn: &libsql::Connection,
    check_item_id: &str,
    document_id: &str,
) -> Result<Option<CheckItemDocument>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SELECT_COLS} FROM check_item_documents WHERE check_item_id = ?1 AND document_id = ?2"
            ),
            libsql::params![check_item_id, document_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_link(&row)?)),
        None => Ok(None),
    }
}

async fn collect_links(mut rows: libsql::Rows) -> Result<Vec<CheckItemDocument>, DatabaseError> {
    let mut links = Vec::new();
    while let Some(row) = rows.next().await? {
        links.push(row_to_link(&row)?);
    }
    Ok(links)
}

impl TallyService {
    /// Link a document to a check item. Fails if the pair is already linked.
    pub async fn link_document(
        &self,
        check_item_id: &str,
        document_id: &str,
        checked: bool,
    ) -> Result<CheckItemDocument, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_LINK).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO check_item_documents (id, check_item_id, document_id, checked, linked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    check_item_id,
                    document_id,
                    checked,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(%id, check_item_id, document_id, checked, "linked document");
        Ok(CheckItemDocument {
            id,
            check_item_id: check_item_id.to_string(),
            document_id: document_id.to_string(),
            checked,
            linked_at: now,
            capture_file: None,
        })
    }

    pub async fn get_link(
        &self,
        check_item_id: &str,
        document_id: &str,
    ) -> Result<Option<CheckItemDocument>, DatabaseError> {
        fetch_link(self.db().conn(), check_item_id, document_id).await
    }

    pub async fn get_link_by_id(&self, id: &str) -> Result<CheckItemDocument, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM check_item_documents WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_link(&row)
    }

    /// Current state code of a pair; `00` when unlinked.
    pub async fn link_state(
        &self,
        check_item_id: &str,
        document_id: &str,
    ) -> Result<LinkState, DatabaseError> {
        let link = self.get_link(check_item_id, document_id).await?;
        Ok(LinkState::of(link.as_ref()))
    }

    /// Capture file names referenced by any link. Not capped.
    pub async fn capture_files(&self) -> Result<HashSet<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT capture_file FROM check_item_documents
                 WHERE capture_file IS NOT NULL AND capture_file != ''",
                (),
            )
            .await?;
        let mut files = HashSet::new();
        while let Some(row) = rows.next().await? {
            files.insert(row.get::<String>(0)?);
        }
        Ok(files)
    }

    pub async fn links_for_item(
        &self,
        check_item_id: &str,
    ) -> Result<Vec<CheckItemDocument>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM check_item_documents WHERE check_item_id = ?1 ORDER BY linked_at, id"
                ),
                [check_item_id],
            )
            .await?;
        collect_links(rows).await
    }

    pub async fn links_for_document(
        &self,
        document_id: &str,
    ) -> Result<Vec<CheckItemDocument>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM check_item_documents WHERE document_id = ?1 ORDER BY linked_at, id"
                ),
                [document_id],
            )
            .await?;
        collect_links(rows).await
    }

    pub async fn list_links(&self, limit: u32) -> Result<Vec<CheckItemDocument>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM check_item_documents ORDER BY linked_at, id LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;
        collect_links(rows).await
    }

    pub async fn set_link_checked(
        &self,
        link_id: &str,
        checked: bool,
    ) -> Result<CheckItemDocument, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE check_item_documents SET checked = ?1 WHERE id = ?2",
                libsql::params![checked, link_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_link_by_id(link_id).await
    }

    /// Record (or clear, with `None`) the capture file of a link.
    pub async fn set_link_capture(
        &self,
        link_id: &str,
        capture_file: Option<&str>,
    ) -> Result<CheckItemDocument, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE check_item_documents SET capture_file = ?1 WHERE id = ?2",
                libsql::params![capture_file, link_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_link_by_id(link_id).await
    }

    /// Remove the link for a pair. Returns whether a row was deleted.
    pub async fn unlink_document(
        &self,
        check_item_id: &str,
        document_id: &str,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "DELETE FROM check_item_documents WHERE check_item_id = ?1 AND document_id = ?2",
                libsql::params![check_item_id, document_id],
            )
            .await?;
        tracing::debug!(check_item_id, document_id, removed = changed > 0, "unlinked document");
        Ok(changed > 0)
    }
}
