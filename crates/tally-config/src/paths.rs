//! Workspace folder layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_log_folder() -> String {
    "logs".to_string()
}

fn default_config_folder() -> String {
    "config".to_string()
}

fn default_documents_folder() -> String {
    "documents".to_string()
}

fn default_captures_folder() -> String {
    "captures".to_string()
}

fn default_checklist_file() -> String {
    "checklist.json".to_string()
}

fn default_database_file() -> String {
    "workspace.db".to_string()
}

/// Folder and file names, relative to the workspace root.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PathSettings {
    #[serde(default = "default_log_folder")]
    pub log_folder: String,

    #[serde(default = "default_config_folder")]
    pub config_folder: String,

    #[serde(default = "default_documents_folder")]
    pub documents_folder: String,

    #[serde(default = "default_captures_folder")]
    pub captures_folder: String,

    /// Checklist definition to sync. Relative names live in the config folder.
    #[serde(default = "default_checklist_file")]
    pub checklist_file: String,

    #[serde(default = "default_database_file")]
    pub database_file: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            log_folder: default_log_folder(),
            config_folder: default_config_folder(),
            documents_folder: default_documents_folder(),
            captures_folder: default_captures_folder(),
            checklist_file: default_checklist_file(),
            database_file: default_database_file(),
        }
    }
}

/// Absolute locations derived from [`PathSettings`] and a workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub logs: PathBuf,
    pub config: PathBuf,
    pub documents: PathBuf,
    pub captures: PathBuf,
    pub checklist_file: PathBuf,
    pub database: PathBuf,
}

impl WorkspacePaths {
    /// Folders `tally init` creates.
    #[must_use]
    pub fn folders(&self) -> [&Path; 4] {
        [&self.logs, &self.config, &self.documents, &self.captures]
    }
}

impl PathSettings {
    /// Resolve every setting against `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any name is blank.
    pub fn resolve(&self, root: &Path) -> Result<WorkspacePaths, ConfigError> {
        let fields = [
            ("paths.log_folder", &self.log_folder),
            ("paths.config_folder", &self.config_folder),
            ("paths.documents_folder", &self.documents_folder),
            ("paths.captures_folder", &self.captures_folder),
            ("paths.checklist_file", &self.checklist_file),
            ("paths.database_file", &self.database_file),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        let config = root.join(&self.config_folder);
        Ok(WorkspacePaths {
            root: root.to_path_buf(),
            logs: root.join(&self.log_folder),
            checklist_file: config.join(&self.checklist_file),
            config,
            documents: root.join(&self.documents_folder),
            captures: root.join(&self.captures_folder),
            database: root.join(&self.database_file),
        })
    }
}
