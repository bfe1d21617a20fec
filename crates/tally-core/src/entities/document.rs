use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered project file, tracked by its path relative to the documents folder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    /// Forward-slash separated, unique across the workspace.
    pub relative_path: String,
    pub file_name: String,
    pub extension: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl Document {
    /// Split a relative path into `(file_name, extension)`.
    ///
    /// The extension is lowercased and `None` when the name has no dot or
    /// starts with one (`.env`).
    #[must_use]
    pub fn name_parts(relative_path: &str) -> (String, Option<String>) {
        let file_name = relative_path
            .rsplit('/')
            .next()
            .unwrap_or(relative_path)
            .to_string();
        let extension = match file_name.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < file_name.len() => {
                Some(file_name[idx + 1..].to_ascii_lowercase())
            }
            _ => None,
        };
        (file_name, extension)
    }

    /// Normalize a user-supplied relative path: backslashes become `/`,
    /// leading `./` and `/` are dropped, empty segments are removed.
    #[must_use]
    pub fn normalize_path(raw: &str) -> String {
        raw.replace('\\', "/")
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/")
    }
}
