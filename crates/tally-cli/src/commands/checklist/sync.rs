use std::path::PathBuf;

use tally_core::checklist::ChecklistLoader;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::files;
use crate::output::output;
use crate::progress::Progress;

pub async fn run(file: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = file.map_or_else(|| ctx.paths.checklist_file.clone(), PathBuf::from);
    let definition = ChecklistLoader::load(&path)?;

    let captures_before = ctx.service.capture_files().await?;
    let progress = Progress::spinner(&format!("Syncing {} nodes", definition.node_count()));
    let report = match ctx.service.sync_checklist(&definition).await {
        Ok(report) => report,
        Err(error) => {
            progress.finish_err("Checklist sync failed");
            return Err(error.into());
        }
    };
    let captures_after = ctx.service.capture_files().await?;
    files::remove_captures(
        &ctx.paths.captures,
        captures_before.difference(&captures_after).map(String::as_str),
    );

    progress.finish_ok(&format!(
        "{} inserted, {} updated, {} deleted",
        report.inserted, report.updated, report.deleted
    ));

    output(&report, flags.format)
}
