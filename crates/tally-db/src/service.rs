//! Service layer hosting every repository method.
//!
//! `TallyService` wraps `TallyDb` (raw database access). All repo methods
//! are implemented as `impl TallyService` blocks under [`crate::repos`].

use crate::TallyDb;
use crate::error::DatabaseError;

/// Repository entry point for one workspace database.
pub struct TallyService {
    db: TallyDb,
}

impl TallyService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TallyDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `TallyDb`.
    #[must_use]
    pub const fn from_db(db: TallyDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TallyDb {
        &self.db
    }
}
