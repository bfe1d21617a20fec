use tally_core::enums::CheckStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::resolve::resolve_item;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    item: &str,
    set: Option<&str>,
    advance: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let item = resolve_item(ctx, item).await?;

    let item = if let Some(status) = set {
        let status = parse_enum::<CheckStatus>(status, "status")?;
        ctx.service.set_check_status(&item.id, status).await?
    } else if advance {
        ctx.service.advance_check_status(&item.id).await?
    } else {
        item
    };

    output(&item, flags.format)
}
