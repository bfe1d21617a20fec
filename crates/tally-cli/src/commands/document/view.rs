use anyhow::{Context, bail};

use crate::commands::shared::resolve::resolve_document;
use crate::context::AppContext;
use crate::files;

/// Hand the document to the system's default viewer.
pub async fn run(document: &str, ctx: &AppContext) -> anyhow::Result<()> {
    let document = resolve_document(ctx, document).await?;
    let path = files::resolve_inside(&ctx.paths.documents, &document.relative_path)?;
    if !path.is_file() {
        bail!("{} is registered but missing on disk", document.relative_path);
    }

    tracing::debug!(path = %path.display(), "opening document");
    open::that(&path).with_context(|| format!("failed to open {}", path.display()))
}
