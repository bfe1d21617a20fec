use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::resolve::{resolve_document, resolve_item};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    item: Option<&str>,
    document: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(flags.limit, 100);

    let mut links = match (item, document) {
        (Some(item), Some(document)) => {
            let item = resolve_item(ctx, item).await?;
            let document = resolve_document(ctx, document).await?;
            ctx.service
                .get_link(&item.id, &document.id)
                .await?
                .into_iter()
                .collect()
        }
        (Some(item), None) => {
            let item = resolve_item(ctx, item).await?;
            ctx.service.links_for_item(&item.id).await?
        }
        (None, Some(document)) => {
            let document = resolve_document(ctx, document).await?;
            ctx.service.links_for_document(&document.id).await?
        }
        (None, None) => ctx.service.list_links(limit).await?,
    };
    links.truncate(usize::try_from(limit)?);

    output(&links, flags.format)
}
