use std::path::Path;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::files;
use crate::output::output;

pub async fn run(
    file: &str,
    move_file: bool,
    dest: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let relative_path = files::import_document(Path::new(file), &ctx.paths.documents, dest, move_file)?;
    let document = ctx.service.register_document(&relative_path).await?;
    output(&document, flags.format)
}
