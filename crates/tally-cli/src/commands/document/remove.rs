use std::fs;

use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::resolve::resolve_document;
use crate::context::AppContext;
use crate::files;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RemoveResponse {
    id: String,
    relative_path: String,
    links_removed: usize,
    captures_removed: usize,
    file_deleted: bool,
}

pub async fn run(
    document: &str,
    delete_file: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let document = resolve_document(ctx, document).await?;
    let links = ctx.service.links_for_document(&document.id).await?;
    ctx.service.delete_document(&document.id).await?;
    let captures_removed = files::remove_captures(
        &ctx.paths.captures,
        links.iter().filter_map(|link| link.capture_file.as_deref()),
    );

    let mut file_deleted = false;
    if delete_file {
        let path = files::resolve_inside(&ctx.paths.documents, &document.relative_path)?;
        if path.is_file() {
            fs::remove_file(&path).with_context(|| format!("failed to delete {}", path.display()))?;
            file_deleted = true;
        }
    }

    output(
        &RemoveResponse {
            id: document.id,
            relative_path: document.relative_path,
            links_removed: links.len(),
            captures_removed,
            file_deleted,
        },
        flags.format,
    )
}
