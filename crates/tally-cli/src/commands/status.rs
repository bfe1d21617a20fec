use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `tally status`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let overview = ctx.service.checklist_overview().await?;
    let done = overview.iter().filter(|row| row.status.is_checked()).count();
    tracing::info!(items = overview.len(), done, "checklist overview");
    output(&overview, flags.format)
}
