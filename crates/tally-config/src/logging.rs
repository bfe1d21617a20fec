//! Logging configuration.

use serde::{Deserialize, Serialize};

fn default_level() -> String {
    "warn".to_string()
}

const fn default_file() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when `TALLY_LOG` is unset (e.g. `info`, `tally_db=debug`).
    #[serde(default = "default_level")]
    pub level: String,

    /// Whether to also write `tally.log` into the log folder.
    #[serde(default = "default_file")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: default_file(),
        }
    }
}
