use serde::Serialize;
use tally_core::entities::{CheckItemDocument, Document};

use crate::cli::GlobalFlags;
use crate::commands::shared::resolve::resolve_document;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DocumentDetail {
    #[serde(flatten)]
    document: Document,
    on_disk: bool,
    links: Vec<CheckItemDocument>,
}

pub async fn run(document: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let document = resolve_document(ctx, document).await?;
    let links = ctx.service.links_for_document(&document.id).await?;
    let on_disk = ctx.paths.documents.join(&document.relative_path).is_file();
    output(
        &DocumentDetail {
            document,
            on_disk,
            links,
        },
        flags.format,
    )
}
