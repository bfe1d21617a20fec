//! File operations inside the documents and captures folders.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use tally_core::entities::Document;

const DEFAULT_CAPTURE_EXT: &str = "png";

/// Per-folder ignore file honored by [`document_files`].
pub const IGNORE_FILE: &str = ".tallyignore";

/// Path of `path` relative to `root`, with forward slashes.
#[must_use]
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Join a stored relative path onto `root`, refusing `..` escapes.
pub fn resolve_inside(root: &Path, relative_path: &str) -> anyhow::Result<PathBuf> {
    let normalized = Document::normalize_path(relative_path);
    if normalized.is_empty() || normalized.split('/').any(|segment| segment == "..") {
        bail!("path '{relative_path}' must stay inside {}", root.display());
    }
    Ok(root.join(normalized))
}

/// Relative paths of every file under `documents`, sorted.
///
/// Hidden files and anything matched by a `.tallyignore` are skipped.
/// Unreadable entries are logged and skipped.
pub fn document_files(documents: &Path) -> anyhow::Result<Vec<String>> {
    if !documents.is_dir() {
        bail!("documents folder {} does not exist", documents.display());
    }

    let mut builder = WalkBuilder::new(documents);
    builder
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .add_custom_ignore_filename(IGNORE_FILE);

    let mut found = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        match relative_to(documents, entry.path()) {
            Some(relative) => found.push(relative),
            None => tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 path"),
        }
    }
    found.sort();
    Ok(found)
}

/// Copy or move `source` into `documents[/dest]`. Returns the new relative path.
pub fn import_document(
    source: &Path,
    documents: &Path,
    dest: Option<&str>,
    move_file: bool,
) -> anyhow::Result<String> {
    if !source.is_file() {
        bail!("document source {} is not a file", source.display());
    }
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("document source {} has no usable file name", source.display()))?;

    let relative_path = match dest {
        Some(dest) => format!("{}/{file_name}", Document::normalize_path(dest)),
        None => file_name.to_string(),
    };
    let target = resolve_inside(documents, &relative_path)?;
    let relative_path = Document::normalize_path(&relative_path);

    // A source already in place only needs registering.
    if fs::canonicalize(source).ok() == fs::canonicalize(&target).ok() && target.exists() {
        return Ok(relative_path);
    }
    if target.exists() {
        bail!("{} already exists in the documents folder", relative_path);
    }

    transfer(source, &target, move_file)?;
    tracing::debug!(source = %source.display(), target = %target.display(), move_file, "imported document");
    Ok(relative_path)
}

/// Copy an image into `captures` as `<item-id>_<doc-id>_<timestamp>.<ext>`.
/// Returns the stored file name.
pub fn store_capture(
    image: &Path,
    captures: &Path,
    check_item_id: &str,
    document_id: &str,
    at: DateTime<Utc>,
) -> anyhow::Result<String> {
    if !image.is_file() {
        bail!("capture image {} is not a file", image.display());
    }
    let ext = image
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or_else(|| DEFAULT_CAPTURE_EXT.to_string(), str::to_ascii_lowercase);
    let file_name = format!(
        "{check_item_id}_{document_id}_{}.{ext}",
        at.format("%Y%m%d%H%M%S")
    );

    transfer(image, &captures.join(&file_name), false)?;
    Ok(file_name)
}

/// Delete capture files no longer referenced by any link. Failures are
/// logged, not returned. Returns how many files were removed.
pub fn remove_captures<'a>(captures: &Path, names: impl IntoIterator<Item = &'a str>) -> usize {
    let mut removed = 0;
    for name in names {
        let path = match resolve_inside(captures, name) {
            Ok(path) => path,
            Err(error) => {
                tracing::warn!(capture = name, %error, "refusing to remove capture");
                continue;
            }
        };
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed unreferenced capture");
                removed += 1;
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => tracing::warn!(path = %path.display(), %error, "failed to remove capture"),
        }
    }
    removed
}

/// Rename a file inside `documents`, creating parent folders as needed.
pub fn rename_inside(documents: &Path, from: &str, to: &str) -> anyhow::Result<()> {
    let source = resolve_inside(documents, from)?;
    let target = resolve_inside(documents, to)?;
    if target.exists() {
        bail!("{to} already exists in the documents folder");
    }
    transfer(&source, &target, true)
}

fn transfer(source: &Path, target: &Path, move_file: bool) -> anyhow::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    if move_file && fs::rename(source, target).is_ok() {
        return Ok(());
    }

    // Copy first; across file systems rename is not available.
    fs::copy(source, target).with_context(|| {
        format!("failed to copy {} to {}", source.display(), target.display())
    })?;
    if move_file {
        fs::remove_file(source)
            .with_context(|| format!("failed to remove {}", source.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn workspace() -> (TempDir, PathBuf) {
        let temp = TempDir::new().expect("tempdir should create");
        let documents = temp.path().join("documents");
        fs::create_dir_all(&documents).expect("documents should create");
        (temp, documents)
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/work/documents");
        assert_eq!(
            relative_to(root, Path::new("/work/documents/plans/A-101.pdf")).as_deref(),
            Some("plans/A-101.pdf")
        );
        assert_eq!(relative_to(root, Path::new("/elsewhere/a.pdf")), None);
        assert_eq!(relative_to(root, root), None);
    }

    #[test]
    fn resolve_rejects_parent_segments() {
        let root = Path::new("/work/documents");
        assert!(resolve_inside(root, "../secrets.txt").is_err());
        assert!(resolve_inside(root, "").is_err());
        assert_eq!(
            resolve_inside(root, "plans\\a.pdf").expect("path should resolve"),
            root.join("plans/a.pdf")
        );
    }

    #[test]
    fn walk_lists_visible_files() {
        let (_temp, documents) = workspace();
        fs::create_dir_all(documents.join("plans/level-1")).expect("dirs should create");
        fs::write(documents.join("plans/level-1/A-101.pdf"), b"a").expect("write");
        fs::write(documents.join("spec.docx"), b"b").expect("write");
        fs::write(documents.join(".hidden"), b"c").expect("write");
        fs::write(documents.join("scratch.tmp"), b"d").expect("write");
        fs::write(documents.join(IGNORE_FILE), "*.tmp\n").expect("write");

        let files = document_files(&documents).expect("walk should succeed");
        assert_eq!(files, vec!["plans/level-1/A-101.pdf", "spec.docx"]);
    }

    #[test]
    fn walk_requires_documents_folder() {
        let temp = TempDir::new().expect("tempdir should create");
        assert!(document_files(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn import_copies_into_subfolder() {
        let (temp, documents) = workspace();
        let source = temp.path().join("A-101.pdf");
        fs::write(&source, b"pdf").expect("source should write");

        let relative = import_document(&source, &documents, Some("plans/level-1"), false)
            .expect("import should succeed");
        assert_eq!(relative, "plans/level-1/A-101.pdf");
        assert!(documents.join("plans/level-1/A-101.pdf").is_file());
        assert!(source.is_file(), "copy keeps the source");
    }

    #[test]
    fn import_move_removes_source() {
        let (temp, documents) = workspace();
        let source = temp.path().join("spec.docx");
        fs::write(&source, b"doc").expect("source should write");

        let relative = import_document(&source, &documents, None, true).expect("import should succeed");
        assert_eq!(relative, "spec.docx");
        assert!(!source.exists());
    }

    #[test]
    fn import_refuses_to_overwrite() {
        let (temp, documents) = workspace();
        let source = temp.path().join("a.pdf");
        fs::write(&source, b"new").expect("source should write");
        fs::write(documents.join("a.pdf"), b"old").expect("existing should write");

        assert!(import_document(&source, &documents, None, false).is_err());
        assert_eq!(fs::read(documents.join("a.pdf")).expect("read"), b"old");
    }

    #[test]
    fn import_of_file_already_in_place_only_registers() {
        let (_temp, documents) = workspace();
        let inside = documents.join("a.pdf");
        fs::write(&inside, b"pdf").expect("file should write");

        let relative = import_document(&inside, &documents, None, false).expect("import should succeed");
        assert_eq!(relative, "a.pdf");
    }

    #[test]
    fn capture_name_encodes_pair_and_time() {
        let temp = TempDir::new().expect("tempdir should create");
        let captures = temp.path().join("captures");
        let image = temp.path().join("Screen Shot.JPG");
        fs::write(&image, b"jpg").expect("image should write");
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();

        let name = store_capture(&image, &captures, "itm-1", "doc-2", at).expect("store should succeed");
        assert_eq!(name, "itm-1_doc-2_20260304050607.jpg");
        assert!(captures.join(&name).is_file());
    }

    #[test]
    fn remove_captures_deletes_only_named_files() {
        let temp = TempDir::new().expect("tempdir should create");
        let captures = temp.path().join("captures");
        fs::create_dir_all(&captures).expect("captures should create");
        fs::write(captures.join("old.png"), b"a").expect("write");
        fs::write(captures.join("keep.png"), b"b").expect("write");
        fs::write(temp.path().join("outside.png"), b"c").expect("write");

        let removed = remove_captures(&captures, ["old.png", "gone.png", "../outside.png"]);
        assert_eq!(removed, 1);
        assert!(!captures.join("old.png").exists());
        assert!(captures.join("keep.png").is_file());
        assert!(temp.path().join("outside.png").is_file());
    }

    #[test]
    fn rename_moves_within_documents() {
        let (_temp, documents) = workspace();
        fs::write(documents.join("old.pdf"), b"pdf").expect("file should write");

        rename_inside(&documents, "old.pdf", "archive/new.pdf").expect("rename should succeed");
        assert!(documents.join("archive/new.pdf").is_file());
        assert!(!documents.join("old.pdf").exists());
    }
}
