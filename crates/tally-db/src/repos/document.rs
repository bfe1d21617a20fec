//! Document repository: registered files under the documents folder.

use chrono::Utc;

use tally_core::entities::Document;
use tally_core::errors::CoreError;
use tally_core::ids::PREFIX_DOCUMENT;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::TallyService;

const SELECT_COLS: &str = "id, relative_path, file_name, extension, added_at";

fn row_to_document(row: &libsql::Row) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: row.get::<String>(0)?,
        relative_path: row.get::<String>(1)?,
        file_name: row.get::<String>(2)?,
        extension: get_opt_string(row, 3)?,
        added_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn normalized(relative_path: &str) -> Result<String, DatabaseError> {
    let path = Document::normalize_path(relative_path);
    if path.is_empty() {
        return Err(CoreError::Validation(format!("document path '{relative_path}' is empty")).into());
    }
    Ok(path)
}

impl TallyService {
    /// Register a document by its path relative to the documents folder.
    ///
    /// Registering a path twice returns the existing row.
    pub async fn register_document(&self, relative_path: &str) -> Result<Document, DatabaseError> {
        let relative_path = normalized(relative_path)?;
        if let Some(existing) = self.find_document_by_path(&relative_path).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DOCUMENT).await?;
        let (file_name, extension) = Document::name_parts(&relative_path);

        self.db()
            .conn()
            .execute(
                "INSERT INTO documents (id, relative_path, file_name, extension, added_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    relative_path.as_str(),
                    file_name.as_str(),
                    extension.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(%id, path = %relative_path, "registered document");
        Ok(Document {
            id,
            relative_path,
            file_name,
            extension,
            added_at: now,
        })
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM documents WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_document(&row)
    }

    pub async fn find_document_by_path(
        &self,
        relative_path: &str,
    ) -> Result<Option<Document>, DatabaseError> {
        let relative_path = Document::normalize_path(relative_path);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM documents WHERE relative_path = ?1"),
                [relative_path.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_document_by_path(&self, relative_path: &str) -> Result<Document, DatabaseError> {
        self.find_document_by_path(relative_path)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// All documents ordered by relative path, capped at `limit`.
    pub async fn list_documents(&self, limit: u32) -> Result<Vec<Document>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM documents ORDER BY relative_path LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;

        let mut documents = Vec::new();
        while let Some(row) = rows.next().await? {
            documents.push(row_to_document(&row)?);
        }
        Ok(documents)
    }

    /// Every registered relative path, ordered. Not capped.
    pub async fn document_paths(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT relative_path FROM documents ORDER BY relative_path", ())
            .await?;

        let mut paths = Vec::new();
        while let Some(row) = rows.next().await? {
            paths.push(row.get::<String>(0)?);
        }
        Ok(paths)
    }

    /// Point a document at a new relative path, keeping its ID and links.
    pub async fn move_document(
        &self,
        id: &str,
        new_relative_path: &str,
    ) -> Result<Document, DatabaseError> {
        let new_relative_path = normalized(new_relative_path)?;
        if let Some(other) = self.find_document_by_path(&new_relative_path).await?
            && other.id != id
        {
            return Err(DatabaseError::InvalidState(format!(
                "document path '{new_relative_path}' is already registered as {}",
                other.id
            )));
        }

        let (file_name, extension) = Document::name_parts(&new_relative_path);
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE documents SET relative_path = ?1, file_name = ?2, extension = ?3 WHERE id = ?4",
                libsql::params![
                    new_relative_path.as_str(),
                    file_name.as_str(),
                    extension.as_deref(),
                    id
                ],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        tracing::debug!(%id, path = %new_relative_path, "moved document");
        self.get_document(id).await
    }

    /// Delete a document. Its links are removed by cascade.
    pub async fn delete_document(&self, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute("DELETE FROM documents WHERE id = ?1", [id])
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(%id, "deleted document");
        Ok(())
    }
}
