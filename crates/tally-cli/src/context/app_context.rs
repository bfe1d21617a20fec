use anyhow::Context;
use tally_config::WorkspacePaths;
use tally_db::service::TallyService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: TallyService,
    pub paths: WorkspacePaths,
}

impl AppContext {
    /// Open the workspace database. Fails if `tally init` has not run.
    pub async fn init(paths: WorkspacePaths) -> anyhow::Result<Self> {
        if !paths.database.is_file() {
            anyhow::bail!(
                "database {} not found. Run 'tally init' first.",
                paths.database.display()
            );
        }

        let db_path = paths.database.to_string_lossy();
        let service = TallyService::new_local(&db_path)
            .await
            .with_context(|| format!("failed to open database {db_path}"))?;

        Ok(Self { service, paths })
    }
}
