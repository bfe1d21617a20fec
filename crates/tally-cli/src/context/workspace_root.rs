use std::path::{Path, PathBuf};

use anyhow::Context;
use tally_config::SETTINGS_FILE;

/// Walk upwards from `start` until a directory holding the settings file or
/// `database_file` is found.
#[must_use]
pub fn find_workspace_root(start: &Path, database_file: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let markers = [SETTINGS_FILE, database_file];
        if markers.iter().any(|marker| current.join(marker).is_file()) {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Pick the workspace root: `--root` when given, otherwise the nearest
/// ancestor with settings or a database, else the current directory.
/// `tally init` starts a new workspace in the current directory instead
/// of searching.
pub fn resolve_workspace_root(
    explicit: Option<&str>,
    for_init: bool,
    database_file: &str,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        let explicit = PathBuf::from(path);
        if explicit.is_dir() || for_init {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --root '{}': directory does not exist",
            explicit.display()
        );
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    if for_init {
        return Ok(cwd);
    }
    Ok(find_workspace_root(&cwd, database_file).unwrap_or(cwd))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{find_workspace_root, resolve_workspace_root};

    #[test]
    fn finds_root_in_current_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::write(temp.path().join("appsettings.json"), "{}").expect("settings should write");

        let found = find_workspace_root(temp.path(), "workspace.db");
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn finds_root_in_parent_directory() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::write(temp.path().join("appsettings.json"), "{}").expect("settings should write");
        std::fs::create_dir_all(temp.path().join("documents/plans")).expect("dirs should create");

        let found = find_workspace_root(&temp.path().join("documents/plans"), "workspace.db");
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn database_alone_marks_a_root() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::write(temp.path().join("workspace.db"), b"").expect("db should write");
        std::fs::create_dir_all(temp.path().join("captures")).expect("dirs should create");

        let found = find_workspace_root(&temp.path().join("captures"), "workspace.db");
        assert_eq!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn configured_database_name_marks_a_root() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::write(temp.path().join("site.db"), b"").expect("db should write");
        std::fs::create_dir_all(temp.path().join("nested/site")).expect("dirs should create");
        std::fs::write(temp.path().join("nested/workspace.db"), b"").expect("db should write");

        let start = temp.path().join("nested/site");
        let found = find_workspace_root(&start, "site.db");
        assert_eq!(found.as_deref(), Some(temp.path()));
        let found = find_workspace_root(&start, "workspace.db");
        assert_eq!(found.as_deref(), Some(temp.path().join("nested").as_path()));
    }

    #[test]
    fn returns_none_when_not_found() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir_all(temp.path().join("a/b")).expect("dirs should create");
        assert!(find_workspace_root(&temp.path().join("a/b"), "workspace.db").is_none());
    }

    #[test]
    fn explicit_root_must_exist_unless_initializing() {
        let temp = TempDir::new().expect("tempdir should create");
        let missing = temp.path().join("new-site");
        let missing = missing.to_str().expect("utf-8 path");

        assert!(resolve_workspace_root(Some(missing), false, "workspace.db").is_err());
        let root = resolve_workspace_root(Some(missing), true, "workspace.db").expect("init accepts new root");
        assert!(root.ends_with("new-site"));
    }
}
