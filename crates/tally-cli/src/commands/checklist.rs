use crate::cli::GlobalFlags;
use crate::cli::subcommands::ChecklistCommands;
use crate::context::AppContext;

mod export;
mod status;
mod sync;
mod tree;

/// Handle `tally checklist`.
pub async fn handle(
    action: &ChecklistCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ChecklistCommands::Sync { file } => sync::run(file.as_deref(), ctx, flags).await,
        ChecklistCommands::Export { out } => export::run(out.as_deref(), ctx, flags).await,
        ChecklistCommands::Tree => tree::run(ctx, flags).await,
        ChecklistCommands::Status { item, set, advance } => {
            status::run(item, set.as_deref(), *advance, ctx, flags).await
        }
    }
}
