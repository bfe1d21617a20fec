use crate::cli::GlobalFlags;
use crate::cli::subcommands::DocumentCommands;
use crate::context::AppContext;

mod add;
mod get;
mod list;
mod remove;
mod rename;
mod scan;
mod view;

/// Handle `tally doc`.
pub async fn handle(
    action: &DocumentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DocumentCommands::Add {
            file,
            move_file,
            dest,
        } => add::run(file, *move_file, dest.as_deref(), ctx, flags).await,
        DocumentCommands::Scan => scan::run(ctx, flags).await,
        DocumentCommands::List => list::run(ctx, flags).await,
        DocumentCommands::Get { document } => get::run(document, ctx, flags).await,
        DocumentCommands::Rename { document, new_path } => {
            rename::run(document, new_path, ctx, flags).await
        }
        DocumentCommands::Remove {
            document,
            delete_file,
        } => remove::run(document, *delete_file, ctx, flags).await,
        DocumentCommands::Open { document } => view::run(document, ctx).await,
    }
}
