use crate::cli::GlobalFlags;
use crate::commands::shared::resolve::resolve_document;
use crate::context::AppContext;
use crate::files;
use crate::output::output;

pub async fn run(
    document: &str,
    new_path: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let document = resolve_document(ctx, document).await?;
    let documents = &ctx.paths.documents;

    let on_disk = files::resolve_inside(documents, &document.relative_path)?.is_file();
    if on_disk {
        files::rename_inside(documents, &document.relative_path, new_path)?;
    } else {
        tracing::warn!(path = %document.relative_path, "document file missing; renaming record only");
    }

    match ctx.service.move_document(&document.id, new_path).await {
        Ok(moved) => output(&moved, flags.format),
        Err(error) => {
            if on_disk {
                files::rename_inside(documents, new_path, &document.relative_path)?;
            }
            Err(error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::run;
    use crate::test_support::{json_flags, test_context};

    #[tokio::test]
    async fn rename_moves_file_and_record() {
        let (_temp, ctx) = test_context().await;
        let document = ctx.service.register_document("old.pdf").await.unwrap();
        fs::write(ctx.paths.documents.join("old.pdf"), b"pdf").unwrap();

        run("old.pdf", "archive/new.pdf", &ctx, &json_flags())
            .await
            .unwrap();

        assert!(ctx.paths.documents.join("archive/new.pdf").is_file());
        assert!(!ctx.paths.documents.join("old.pdf").exists());
        let moved = ctx.service.get_document(&document.id).await.unwrap();
        assert_eq!(moved.relative_path, "archive/new.pdf");
    }

    #[tokio::test]
    async fn failed_record_update_puts_file_back() {
        let (_temp, ctx) = test_context().await;
        let document = ctx.service.register_document("a.pdf").await.unwrap();
        // Registered but absent on disk, so the file rename succeeds and
        // the record update is the step that fails.
        ctx.service.register_document("b.pdf").await.unwrap();
        fs::write(ctx.paths.documents.join("a.pdf"), b"pdf").unwrap();

        let result = run("a.pdf", "b.pdf", &ctx, &json_flags()).await;

        assert!(result.is_err());
        assert!(ctx.paths.documents.join("a.pdf").is_file());
        assert!(!ctx.paths.documents.join("b.pdf").exists());
        let unchanged = ctx.service.get_document(&document.id).await.unwrap();
        assert_eq!(unchanged.relative_path, "a.pdf");
    }
}
