use std::fs;

use anyhow::Context;
use serde::Serialize;
use tally_config::{SETTINGS_FILE, TallyConfig, WorkspacePaths};
use tally_core::checklist::{ChecklistDefinition, ChecklistSaver};
use tally_db::service::TallyService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    root: String,
    created: Vec<String>,
    database: String,
    checklist_file: String,
}

/// Handle `tally init`: folders, settings, empty checklist, database.
pub async fn handle(
    args: &InitArgs,
    config: &TallyConfig,
    paths: &WorkspacePaths,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut created = Vec::new();

    fs::create_dir_all(&paths.root)
        .with_context(|| format!("failed to create {}", paths.root.display()))?;
    for folder in paths.folders() {
        if !folder.is_dir() {
            fs::create_dir_all(folder)
                .with_context(|| format!("failed to create {}", folder.display()))?;
            created.push(folder.display().to_string());
        }
    }

    let settings = paths.root.join(SETTINGS_FILE);
    if args.force || !settings.exists() {
        config
            .write_settings(&paths.root)
            .context("failed to write workspace settings")?;
        created.push(settings.display().to_string());
    }

    if !paths.checklist_file.exists() {
        ChecklistSaver::save(&ChecklistDefinition::default(), &paths.checklist_file)
            .context("failed to write empty checklist")?;
        created.push(paths.checklist_file.display().to_string());
    }

    let existed = paths.database.is_file();
    TallyService::new_local(&paths.database.to_string_lossy())
        .await
        .context("failed to create workspace database")?;
    if !existed {
        created.push(paths.database.display().to_string());
    }

    tracing::info!(root = %paths.root.display(), created = created.len(), "workspace initialized");
    output(
        &InitResponse {
            root: paths.root.display().to_string(),
            created,
            database: paths.database.display().to_string(),
            checklist_file: paths.checklist_file.display().to_string(),
        },
        flags.format,
    )
}
