use serde::Serialize;
use tally_core::enums::LinkState;

use crate::cli::GlobalFlags;
use crate::commands::shared::resolve::{resolve_document, resolve_item};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LinkStateView {
    item_path: String,
    document_path: String,
    state: LinkState,
    linked: bool,
    checked: bool,
    capture_file: Option<String>,
}

pub async fn run(item: &str, document: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let item = resolve_item(ctx, item).await?;
    let document = resolve_document(ctx, document).await?;
    let link = ctx.service.get_link(&item.id, &document.id).await?;
    let state = LinkState::of(link.as_ref());

    output(
        &LinkStateView {
            item_path: item.path,
            document_path: document.relative_path,
            state,
            linked: state.is_linked(),
            checked: state.is_checked(),
            capture_file: link.and_then(|link| link.capture_file),
        },
        flags.format,
    )
}
