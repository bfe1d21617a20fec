use tally_core::transition::LinkEvent;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LinkCommands;
use crate::context::AppContext;

mod change;
mod list;
mod state;

pub use change::commit_change;
use change::CaptureSource;

/// Handle `tally link`.
pub async fn handle(action: &LinkCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        LinkCommands::Check {
            item,
            document,
            capture,
            no_capture,
        } => {
            let source = match (capture, no_capture) {
                (Some(image), _) => CaptureSource::Image(image.clone()),
                (None, true) => CaptureSource::Skip,
                (None, false) => CaptureSource::Ask,
            };
            change::run(item, document, LinkEvent::Check, source, ctx, flags).await
        }
        LinkCommands::Uncheck { item, document } => {
            change::run(item, document, LinkEvent::Uncheck, CaptureSource::Skip, ctx, flags).await
        }
        LinkCommands::Remove { item, document } => {
            change::run(item, document, LinkEvent::Unlink, CaptureSource::Skip, ctx, flags).await
        }
        LinkCommands::List { item, document } => {
            list::run(item.as_deref(), document.as_deref(), ctx, flags).await
        }
        LinkCommands::State { item, document } => state::run(item, document, ctx, flags).await,
    }
}
