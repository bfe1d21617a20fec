use std::path::Path;

use chrono::Utc;
use tally_core::transition::ChecklistStateManager;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CaptureCommands;
use crate::commands::link::commit_change;
use crate::commands::shared::resolve::{resolve_document, resolve_item};
use crate::context::AppContext;
use crate::files;

/// Handle `tally capture`.
pub async fn handle(action: &CaptureCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CaptureCommands::Attach {
            item,
            document,
            image,
        } => attach(item, document, image, ctx, flags).await,
    }
}

async fn attach(
    item: &str,
    document: &str,
    image: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let item = resolve_item(ctx, item).await?;
    let document = resolve_document(ctx, document).await?;
    let from = ctx.service.link_state(&item.id, &document.id).await?;

    let name = files::store_capture(
        Path::new(image),
        &ctx.paths.captures,
        &item.id,
        &document.id,
        Utc::now(),
    )?;
    let stored = ctx.paths.captures.join(&name);
    if from.has_capture() {
        tracing::debug!(state = %from, capture = %name, "replacing existing capture");
    }

    let transition = ChecklistStateManager::attach_capture(&item.id, &document.id, from, &name)?;
    commit_change(ctx, &item, &document, transition, Some(stored), flags).await
}
