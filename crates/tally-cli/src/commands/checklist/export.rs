use std::path::PathBuf;

use serde::Serialize;
use tally_core::checklist::ChecklistSaver;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportResponse {
    path: String,
    nodes: usize,
}

pub async fn run(out: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let definition = ctx.service.export_checklist().await?;

    let Some(out) = out else {
        // The definition itself is the output; print it as the file would read.
        println!("{}", ChecklistSaver::to_string(&definition)?);
        return Ok(());
    };

    let path = PathBuf::from(out);
    ChecklistSaver::save(&definition, &path)?;
    output(
        &ExportResponse {
            path: path.display().to_string(),
            nodes: definition.node_count(),
        },
        flags.format,
    )
}
